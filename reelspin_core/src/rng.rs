use hmac::{Hmac, Mac};
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

// Deterministic RNG using provably-fair HMAC construction
// server_seed (secret) + client_seed + nonce -> HMAC-SHA256 -> bytes -> floats in [0,1)

pub type HmacSha256 = Hmac<Sha256>;

/// Source of uniform draws in `[0, 1)`. The controller asks for one batch per spin cycle.
pub trait RandomSource {
    fn next_floats(&mut self, count: usize) -> Vec<f64>;
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_floats(&mut self, count: usize) -> Vec<f64> {
        (**self).next_floats(count)
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

pub fn derive_floats(hmac_bytes: &[u8], count: usize) -> Vec<f64> {
    // Convert successive 4-byte chunks into u32 then map to [0,1)
    let mut out = Vec::with_capacity(count);
    let mut buffer = hmac_bytes.to_vec();
    let mut i = 0usize;
    while out.len() < count {
        if i + 4 > buffer.len() {
            // extend the buffer deterministically by hashing the previous buffer
            buffer = Sha256::digest(&buffer).to_vec();
            i = 0;
            continue;
        }
        let chunk = &buffer[i..i + 4];
        let v = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        out.push((v as f64) / (u32::MAX as f64 + 1.0));
        i += 4;
    }
    out
}

#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    pub server_seed: String, // secret
    pub client_seed: String,
    pub nonce: u64,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        let msg = format!("{}:{}", self.client_seed, self.nonce);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    /// Draws for the current nonce without consuming it.
    pub fn peek_floats(&self, count: usize) -> Vec<f64> {
        derive_floats(&self.hmac_bytes(), count)
    }
}

impl RandomSource for ProvablyFairRng {
    /// Each batch is bound to one nonce; the nonce advances afterwards.
    fn next_floats(&mut self, count: usize) -> Vec<f64> {
        let out = self.peek_floats(count);
        self.nonce += 1;
        out
    }
}

/// Adapter for any `rand` generator.
#[derive(Debug, Clone)]
pub struct StdRandom<R>(pub R);

impl<R: RngCore> RandomSource for StdRandom<R> {
    fn next_floats(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.0.gen::<f64>()).collect()
    }
}

/// Replays a fixed list of draws, wrapping around when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    draws: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "sequence needs at least one draw");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "draws must lie in [0, 1)"
        );
        Self { draws, cursor: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_floats(&mut self, count: usize) -> Vec<f64> {
        let out = (0..count)
            .map(|k| self.draws[(self.cursor + k) % self.draws.len()])
            .collect();
        self.cursor += count;
        out
    }
}
