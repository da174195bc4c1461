use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 32;

const ENCRYPTION_LABEL: &[u8] = b"ticket-box encryption";
const AUTHENTICATION_LABEL: &[u8] = b"ticket-box authentication";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("sealed data of {0} bytes is too short to carry a nonce and tag")]
    Truncated(usize),
    #[error("authentication tag does not match")]
    TagMismatch,
}

pub struct RealmKey([u8; KEY_LEN]);

impl RealmKey {
    pub fn generate() -> Self {
        let mut key = [0; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);

        Self(key)
    }

    /// Stretches a realm password into a key, the realm name acts as salt and varies the
    /// iteration count.
    pub fn derive(realm: &str, password: &str) -> Self {
        let salt: u32 = realm.bytes().map(u32::from).sum();
        let iteration_count = 65000 + salt % 1024;

        let mut key: [u8; KEY_LEN] = Sha256::new()
            .chain_update(realm.as_bytes())
            .chain_update([0u8])
            .chain_update(password.as_bytes())
            .finalize()
            .into();

        for _ in 0..iteration_count {
            key = Sha256::digest(key).into();
        }

        Self(key)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    fn subkey(&self, label: &[u8]) -> [u8; KEY_LEN] {
        let mut mac = keyed_mac(&self.0);
        mac.update(label);

        mac.finalize().into_bytes().into()
    }
}

impl Debug for RealmKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("RealmKey(..)")
    }
}

fn keyed_mac(key: &[u8]) -> HmacSha256 {
    <HmacSha256 as Mac>::new_from_slice(key).expect("hmac accepts keys of any length")
}

/// Sealed layout is `nonce || ciphertext || tag`, where the ciphertext is ChaCha20 and the
/// tag is HMAC-SHA256 over nonce and ciphertext.
pub struct TicketBox {
    encryption_key: [u8; KEY_LEN],
    mac: HmacSha256,
}

impl TicketBox {
    pub fn new(key: RealmKey) -> Self {
        Self {
            encryption_key: key.subkey(ENCRYPTION_LABEL),
            mac: keyed_mac(&key.subkey(AUTHENTICATION_LABEL)),
        }
    }

    pub fn seal(&self, plaintext: &[u8]) -> Box<[u8]> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let mut data = Vec::with_capacity(NONCE_LEN + plaintext.len() + TAG_LEN);
        data.extend_from_slice(&nonce);
        data.extend_from_slice(plaintext);

        let mut cipher = ChaCha20::new(&self.encryption_key.into(), &nonce.into());
        cipher.apply_keystream(&mut data[NONCE_LEN..]);

        let mut mac = self.mac.clone();
        mac.update(&data);
        let tag = mac.finalize().into_bytes();

        data.extend_from_slice(&tag);

        data.into_boxed_slice()
    }

    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, AuthFailure> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(AuthFailure::Truncated(sealed.len()));
        }

        let (authenticated, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        let mut mac = self.mac.clone();
        mac.update(authenticated);
        mac.verify_slice(tag).map_err(|_| AuthFailure::TagMismatch)?;

        let (nonce, ciphertext) = authenticated.split_at(NONCE_LEN);
        let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| AuthFailure::Truncated(sealed.len()))?;

        let mut plaintext = ciphertext.to_vec();

        let mut cipher = ChaCha20::new(&self.encryption_key.into(), &nonce.into());
        cipher.apply_keystream(&mut plaintext);

        Ok(plaintext)
    }

    pub fn opener(self: &Arc<Self>) -> TicketOpener {
        TicketOpener(self.clone())
    }
}

/// Open-only view of another authority's [`TicketBox`].
#[derive(Clone)]
pub struct TicketOpener(Arc<TicketBox>);

impl TicketOpener {
    #[inline]
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, AuthFailure> {
        self.0.open(sealed)
    }
}
