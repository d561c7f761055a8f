//! Auth Adapters - 请求身份校验实现

mod clerk_verifier;
mod dev_verifier;

pub use clerk_verifier::ClerkVerifier;
pub use dev_verifier::DevVerifier;
