pub mod pool;
pub mod store;

pub use pool::DbPool;
pub use store::{Collection, StoreError};
