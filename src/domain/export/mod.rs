pub mod slice_file;
