use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use showcase_client::{ShowcaseClient, first_path, proto, single_path};

#[derive(Parser, Debug)]
#[command(name = "showcase-client", version, author, about = "Showcase client")]
struct Cli {
    /// Server address, e.g. http://127.0.0.1:7469
    #[arg(long, default_value = "http://127.0.0.1:7469")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Echo content back, or fail with the given status
    Echo(EchoCmd),
    /// Stream back each whitespace-separated word
    Expand(EchoCmd),
    /// Stream contents up and receive them joined
    Collect(StreamCmd),
    /// Send contents one at a time and print each reply
    Chat(StreamCmd),
    /// Answer after a delay
    Timeout(TimeoutCmd),
    /// Register a retry sequence of status codes
    SetupRetry(SetupRetryCmd),
    /// Consume the next status of a retry sequence
    Retry(RetryCmd),
    /// Start a long-running operation
    Longrunning(LongrunningCmd),
    /// Poll a long-running operation
    GetOperation(OperationCmd),
    /// List known long-running operations
    ListOperations(ListOperationsCmd),
    /// Cancel a pending long-running operation
    CancelOperation(OperationCmd),
    /// Forget a long-running operation
    DeleteOperation(OperationCmd),
    /// Block until an operation is done or the timeout elapses
    WaitOperation(WaitOperationCmd),
    /// Fetch integer pages
    Pagination(PaginationCmd),
    /// Render templated paths and send them through ResourceName
    ResourceName(ResourceNameCmd),
    /// Build a nested message from flat arguments and echo it
    ParameterFlattening(ParameterFlatteningCmd),
}

#[derive(Args, Debug)]
struct ErrorArgs {
    /// Status code to fail with (0 = succeed)
    #[arg(long, default_value_t = 0)]
    error_code: i32,
    #[arg(long, default_value = "")]
    error_message: String,
}

impl ErrorArgs {
    fn status(&self) -> Option<proto::RpcStatus> {
        (self.error_code != 0).then(|| proto::RpcStatus {
            code: self.error_code,
            message: self.error_message.clone(),
            details: Vec::new(),
        })
    }
}

#[derive(Args, Debug)]
struct EchoCmd {
    #[arg(long, default_value = "")]
    content: String,
    #[command(flatten)]
    error: ErrorArgs,
}

#[derive(Args, Debug)]
struct StreamCmd {
    /// Content to send. Repeat to send several messages.
    #[arg(long, required = true)]
    content: Vec<String>,
}

#[derive(Args, Debug)]
struct TimeoutCmd {
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
    #[arg(long, default_value = "")]
    content: String,
    #[command(flatten)]
    error: ErrorArgs,
}

#[derive(Args, Debug)]
struct SetupRetryCmd {
    /// Status code to return. Repeat in call order.
    #[arg(long = "code", required = true)]
    codes: Vec<i32>,
}

#[derive(Args, Debug)]
struct RetryCmd {
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct LongrunningCmd {
    /// Milliseconds from now until the operation completes
    #[arg(long, default_value_t = 0)]
    after_ms: i64,
    #[arg(long, default_value = "")]
    content: String,
    #[command(flatten)]
    error: ErrorArgs,
    /// Poll until done
    #[arg(long, default_value_t = false)]
    wait: bool,
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,
}

#[derive(Args, Debug)]
struct OperationCmd {
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct ListOperationsCmd {
    /// Operations per page (0 = all)
    #[arg(long, default_value_t = 0)]
    page_size: i32,
    #[arg(long, default_value = "")]
    page_token: String,
}

#[derive(Args, Debug)]
struct WaitOperationCmd {
    #[arg(long)]
    name: String,
    /// Give up after this many milliseconds (0 = wait until done)
    #[arg(long, default_value_t = 0)]
    timeout_ms: u64,
}

#[derive(Args, Debug)]
struct PaginationCmd {
    #[arg(long)]
    max_response: i32,
    #[arg(long, default_value_t = 0)]
    page_size: i32,
    #[arg(long, default_value = "")]
    page_token: String,
    /// Follow next_page_token until exhausted
    #[arg(long, default_value_t = false)]
    all: bool,
}

#[derive(Args, Debug)]
struct ResourceNameCmd {
    #[arg(long)]
    id: String,
}

#[derive(Args, Debug)]
struct ParameterFlatteningCmd {
    #[arg(long, default_value = "")]
    content: String,
    /// Repeatable
    #[arg(long = "repeated")]
    repeated_content: Vec<String>,
    /// Content of the nested message, if any
    #[arg(long)]
    nested: Option<String>,
}

fn proto_duration_from_millis(millis: u64) -> prost_types::Duration {
    prost_types::Duration {
        seconds: (millis / 1000) as i64,
        nanos: ((millis % 1000) * 1_000_000) as i32,
    }
}

fn print_operation(op: &proto::Operation) {
    println!("name: {}\ndone: {}", op.name, op.done);
    match &op.result {
        Some(proto::operation::Result::Error(status)) => {
            println!("error: {} {}", status.code, status.message);
        }
        Some(proto::operation::Result::Response(any)) => {
            println!("response: {} ({} bytes)", any.type_url, any.value.len());
        }
        None => {}
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let clients = ShowcaseClient::connect(cli.addr.clone()).await?;
    match cli.command {
        Commands::Echo(args) => {
            let req = proto::EchoRequest {
                content: args.content,
                error: args.error.status(),
            };
            let resp = clients.showcase().echo(req).await?.into_inner();
            println!("{}", resp.content);
        }
        Commands::Expand(args) => {
            let req = proto::ExpandRequest {
                content: args.content,
                error: args.error.status(),
            };
            let mut stream = clients.showcase().expand(req).await?.into_inner();
            while let Some(item) = stream.message().await? {
                println!("{}", item.content);
            }
        }
        Commands::Collect(args) => {
            let requests = args.content.into_iter().map(|content| proto::EchoRequest {
                content,
                error: None,
            });
            let resp = clients
                .showcase()
                .collect(tokio_stream::iter(requests))
                .await?
                .into_inner();
            println!("{}", resp.content);
        }
        Commands::Chat(args) => {
            let requests = args.content.into_iter().map(|content| proto::EchoRequest {
                content,
                error: None,
            });
            let mut stream = clients
                .showcase()
                .chat(tokio_stream::iter(requests))
                .await?
                .into_inner();
            while let Some(item) = stream.message().await? {
                println!("{}", item.content);
            }
        }
        Commands::Timeout(args) => {
            let req = proto::TimeoutRequest {
                response_delay: Some(proto_duration_from_millis(args.delay_ms)),
                error: args.error.status(),
                success: Some(proto::TimeoutResponse {
                    content: args.content,
                }),
            };
            let resp = clients.showcase().timeout(req).await?.into_inner();
            println!("{}", resp.content);
        }
        Commands::SetupRetry(args) => {
            let req = proto::SetupRetryRequest {
                responses: args
                    .codes
                    .into_iter()
                    .map(|code| proto::RpcStatus {
                        code,
                        message: String::new(),
                        details: Vec::new(),
                    })
                    .collect(),
            };
            let resp = clients.showcase().setup_retry(req).await?.into_inner();
            println!("id: {}", resp.id);
        }
        Commands::Retry(args) => {
            clients
                .showcase()
                .retry(proto::RetryId { id: args.id })
                .await?;
            println!("ok");
        }
        Commands::Longrunning(args) => {
            let completion = chrono::Utc::now() + chrono::Duration::milliseconds(args.after_ms);
            let req = proto::LongrunningRequest {
                completion_time: Some(prost_types::Timestamp {
                    seconds: completion.timestamp(),
                    nanos: completion.timestamp_subsec_nanos() as i32,
                }),
                error: args.error.status(),
                success: Some(proto::LongrunningResponse {
                    content: args.content,
                }),
            };
            let mut op = clients.showcase().longrunning(req).await?.into_inner();
            if args.wait {
                op = clients
                    .wait_for_operation(op, Duration::from_millis(args.poll_ms))
                    .await?;
            }
            print_operation(&op);
        }
        Commands::GetOperation(args) => {
            let op = clients
                .operations()
                .get_operation(proto::GetOperationRequest { name: args.name })
                .await?
                .into_inner();
            print_operation(&op);
        }
        Commands::ListOperations(args) => {
            let resp = clients
                .operations()
                .list_operations(proto::ListOperationsRequest {
                    name: String::new(),
                    filter: String::new(),
                    page_size: args.page_size,
                    page_token: args.page_token,
                })
                .await?
                .into_inner();
            for op in &resp.operations {
                println!("{} done={}", op.name, op.done);
            }
            if !resp.next_page_token.is_empty() {
                println!("next_page_token: {}", resp.next_page_token);
            }
        }
        Commands::CancelOperation(args) => {
            clients
                .operations()
                .cancel_operation(proto::CancelOperationRequest { name: args.name })
                .await?;
            println!("cancelled");
        }
        Commands::DeleteOperation(args) => {
            clients
                .operations()
                .delete_operation(proto::DeleteOperationRequest { name: args.name })
                .await?;
            println!("deleted");
        }
        Commands::WaitOperation(args) => {
            let req = proto::WaitOperationRequest {
                name: args.name,
                timeout: (args.timeout_ms > 0).then(|| proto_duration_from_millis(args.timeout_ms)),
            };
            let op = clients.operations().wait_operation(req).await?.into_inner();
            print_operation(&op);
        }
        Commands::Pagination(args) => {
            if args.all {
                let all = clients
                    .paginate_all(args.max_response, args.page_size)
                    .await?;
                println!("{all:?}");
            } else {
                let req = proto::PaginationRequest {
                    max_response: args.max_response,
                    page_size: args.page_size,
                    page_token: args.page_token,
                    page_size_override: 0,
                };
                let resp = clients.showcase().pagination(req).await?.into_inner();
                println!(
                    "responses: {:?}\nnext_page_token: {}",
                    resp.responses, resp.next_page_token
                );
            }
        }
        Commands::ResourceName(args) => {
            let req = proto::ResourceNameMessage {
                single_template: single_path(&args.id),
                multiple_templates: first_path(&args.id),
            };
            let resp = clients.showcase().resource_name(req).await?.into_inner();
            println!(
                "single_template: {}\nmultiple_templates: {}",
                resp.single_template, resp.multiple_templates
            );
        }
        Commands::ParameterFlattening(args) => {
            let req = proto::ParameterFlatteningMessage {
                content: args.content,
                repeated_content: args.repeated_content,
                nested: args.nested.map(|content| {
                    Box::new(proto::ParameterFlatteningMessage {
                        content,
                        ..Default::default()
                    })
                }),
            };
            let resp = clients
                .showcase()
                .parameter_flattening(req)
                .await?
                .into_inner();
            println!("{resp:?}");
        }
    }
    Ok(())
}
