pub mod common {
    pub use bookshelf_common::*;
}

#[cfg(feature = "api")]
pub mod api {
    pub use bookshelf_api::*;
}

#[cfg(feature = "service")]
pub mod service {
    pub use bookshelf_service::*;
}
