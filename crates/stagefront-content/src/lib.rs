pub mod assets;
pub mod cms;
pub mod decode;
pub mod errors;
pub mod mem;
pub mod traits;

pub use assets::{AssetResolver, ImageSize};
pub use cms::{CmsClient, CmsConfig};
pub use errors::{Result, StoreError};
pub use mem::InMemoryStore;
pub use traits::ContentStore;
