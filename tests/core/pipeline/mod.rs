//! Pipeline layer tests
//!
//! Chunking whole directories, then extracting, saving and validating
//! triplets the way a full run does.

mod test_chunking;
mod test_triplets;
