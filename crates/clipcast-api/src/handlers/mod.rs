pub mod accounts;
pub mod media_delete;
pub mod media_list;
pub mod media_moderation;
pub mod media_stream;
pub mod media_upload;
