pub mod decode;
pub mod test_utils;
