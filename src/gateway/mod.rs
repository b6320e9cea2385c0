pub mod proxy;

pub use proxy::{router, AppState, PROXY_PATH};
