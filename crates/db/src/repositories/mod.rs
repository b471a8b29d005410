//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod form_repo;
pub mod form_response_repo;
pub mod playlist_repo;
pub mod setting_repo;
pub mod whatsapp_user_repo;

pub use form_repo::FormRepo;
pub use form_response_repo::FormResponseRepo;
pub use playlist_repo::PlaylistRepo;
pub use setting_repo::SettingRepo;
pub use whatsapp_user_repo::WhatsappUserRepo;
