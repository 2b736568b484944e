pub mod link;
pub mod parse;
pub mod scan;
