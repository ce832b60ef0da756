pub mod fs_photo_placer;
pub mod fs_photo_scanner;
pub mod image_frame_decoder;
pub mod memory_photo_library;
