//! Minimal `.docx` document model and package writer

pub mod model;
pub mod styles;
pub mod writer;

pub use model::{
    Alignment, BlockContainer, Body, BodyItem, Document, Hyperlink, Inline, NativeCell,
    NativeTable, Paragraph, Relationships, Run, RunColor, VMerge, NORMAL_STYLE,
};
pub use writer::write_docx;
