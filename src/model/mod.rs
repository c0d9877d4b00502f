pub mod bundle;
pub mod conversion;
pub mod entity;
pub mod kind;
pub mod value;

pub use bundle::*;
pub use conversion::*;
pub use entity::*;
pub use kind::*;
pub use value::*;
