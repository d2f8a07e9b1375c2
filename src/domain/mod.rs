pub mod compositor;
pub mod export;
pub mod image_set;
pub mod in_memory_images;
pub mod input_source;
pub mod mask_geometry;
pub mod pattern;
pub mod slice_engine;
