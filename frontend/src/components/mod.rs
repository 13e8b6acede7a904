pub mod mapping_editor;
