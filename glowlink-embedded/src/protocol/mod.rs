mod codec;

pub use codec::{decode_control, encode_register, encode_state};
