//! Plain message digests over the UTF-8 bytes of the input

use crate::Result;
use crate::hashing::HashOptions;
use crate::hashing::traits::{AlgorithmDescriptor, HashAlgorithmImpl};
use sha2::Digest;
use std::marker::PhantomData;

/// Any RustCrypto [`Digest`] exposed as a registry algorithm
pub struct DigestAlgorithm<D> {
    descriptor: AlgorithmDescriptor,
    _digest: PhantomData<fn() -> D>,
}

impl<D> DigestAlgorithm<D> {
    pub fn new(descriptor: AlgorithmDescriptor) -> Self {
        Self {
            descriptor,
            _digest: PhantomData,
        }
    }
}

impl<D: Digest> HashAlgorithmImpl for DigestAlgorithm<D> {
    fn descriptor(&self) -> AlgorithmDescriptor {
        self.descriptor
    }

    fn compute(&self, text: &str, _options: &HashOptions) -> Result<String> {
        Ok(hex::encode(D::digest(text.as_bytes())))
    }
}
