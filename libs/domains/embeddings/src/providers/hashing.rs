use async_trait::async_trait;

use crate::error::{EmbeddingError, EmbeddingResult, ensure_usable};
use crate::provider::{EmbeddingProvider, EmbeddingProviderType};
use crate::similarity::l2_normalize;

pub const DEFAULT_HASHING_DIMENSION: usize = 384;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Local feature-hashing embedder.
///
/// Lowercased words are padded with spaces and split into character
/// trigrams; each trigram increments one FNV-1a bucket. The result is
/// L2-normalised, so texts sharing word fragments ("robotics", "robots")
/// score above zero. Never touches the network.
#[derive(Debug, Clone)]
pub struct HashingProvider {
    dimension: usize,
}

impl HashingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let padded: Vec<char> = std::iter::once(' ')
                .chain(word.chars().flat_map(char::to_lowercase))
                .chain(std::iter::once(' '))
                .collect();

            for gram in padded.windows(3) {
                let bucket = (fnv1a(gram) % self.dimension as u64) as usize;
                vector[bucket] += 1.0;
            }
        }

        l2_normalize(&mut vector);
        vector
    }
}

impl Default for HashingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

fn fnv1a(chars: &[char]) -> u64 {
    let mut hash = FNV_OFFSET;
    for c in chars {
        let mut buf = [0u8; 4];
        for byte in c.encode_utf8(&mut buf).bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

#[async_trait]
impl EmbeddingProvider for HashingProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Hashing
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        ensure_usable(self.vectorize(text))
    }
}
