pub mod body_encoder;
pub mod builders;
pub mod multipart;
pub mod services;
pub mod validator;
