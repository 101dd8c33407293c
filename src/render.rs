pub(crate) mod adapter;
pub(crate) mod fonts;
pub(crate) mod svg;
pub(crate) mod timeout;
