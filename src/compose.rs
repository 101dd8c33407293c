pub(crate) mod canvas;
pub(crate) mod cell;
pub(crate) mod label;
