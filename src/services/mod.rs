pub mod cloudinary;
pub mod media_store;
pub mod upload_service;
