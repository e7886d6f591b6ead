/// Fallback page size when a pagination request sets neither size field.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Largest page a single pagination request may ask for.
pub const MAX_PAGE_SIZE: i32 = 10_000;

/// Items allowed in flight per streaming direction.
pub const DEFAULT_STREAM_BUFFER: usize = 1;

/// Tunables shared by the service dispatcher and the registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseConfig {
    pub default_page_size: i32,
    pub stream_buffer: usize,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

impl ShowcaseConfig {
    /// Non-positive page sizes and an empty stream buffer fall back to the defaults;
    /// page sizes above [`MAX_PAGE_SIZE`] are capped.
    pub fn new(default_page_size: i32, stream_buffer: usize) -> Self {
        Self {
            default_page_size: if default_page_size > 0 {
                default_page_size.min(MAX_PAGE_SIZE)
            } else {
                DEFAULT_PAGE_SIZE
            },
            stream_buffer: stream_buffer.max(1),
        }
    }
}
