use crate::constants::SECP_SIGNATURE_SIZE;
use crate::error::{Result, TxBuildError};
use crate::tx_helper::TxSkeleton;
use crate::util::clear_0x;
use ckb_hash::{blake2b_256, new_blake2b};
use ckb_types::{
    bytes::Bytes,
    core::TransactionView,
    packed::WitnessArgs,
    prelude::*,
    H160, H256,
};
use secp256k1::{ecdsa::RecoverableSignature, Message, PublicKey, SecretKey, SECP256K1};

pub trait KeySigner {
    /// blake160 of the signer's public key, the args of its sighash lock
    fn lock_args(&self) -> Bytes;

    fn sign_recoverable(&self, message: &H256) -> Result<[u8; SECP_SIGNATURE_SIZE]>;
}

pub struct SecpSigner {
    privkey: SecretKey,
    lock_args: H160,
}

impl SecpSigner {
    pub fn new(privkey: SecretKey) -> Self {
        let pubkey = PublicKey::from_secret_key(SECP256K1, &privkey);
        let mut lock_args = [0u8; 20];
        lock_args.copy_from_slice(&blake2b_256(&pubkey.serialize()[..])[0..20]);
        SecpSigner {
            privkey,
            lock_args: H160(lock_args),
        }
    }

    /// Hex private key, `0x` prefix optional. A missing or unusable key is
    /// reported as `SigningKeyMissing`.
    pub fn from_privkey_str(privkey: Option<&str>) -> Result<Self> {
        let privkey = privkey
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(TxBuildError::SigningKeyMissing)?;
        let privkey_bytes = hex::decode(clear_0x(privkey)).map_err(|e| {
            log::error!("private key is not hex: {}", e);
            TxBuildError::SigningKeyMissing
        })?;
        let privkey = SecretKey::from_slice(&privkey_bytes).map_err(|e| {
            log::error!("invalid secp256k1 private key: {}", e);
            TxBuildError::SigningKeyMissing
        })?;
        Ok(Self::new(privkey))
    }

    pub fn pubkey(&self) -> PublicKey {
        PublicKey::from_secret_key(SECP256K1, &self.privkey)
    }
}

impl KeySigner for SecpSigner {
    fn lock_args(&self) -> Bytes {
        Bytes::from(self.lock_args.as_bytes().to_vec())
    }

    fn sign_recoverable(&self, message: &H256) -> Result<[u8; SECP_SIGNATURE_SIZE]> {
        let message = Message::from_digest_slice(message.as_bytes())
            .map_err(|e| TxBuildError::MalformedDraft(format!("invalid signing message: {}", e)))?;
        let signature = SECP256K1.sign_ecdsa_recoverable(&message, &self.privkey);
        Ok(serialize_signature(&signature))
    }
}

pub fn serialize_signature(signature: &RecoverableSignature) -> [u8; SECP_SIGNATURE_SIZE] {
    let (recov_id, data) = signature.serialize_compact();
    let mut signature_bytes = [0u8; SECP_SIGNATURE_SIZE];
    signature_bytes[0..64].copy_from_slice(&data[0..64]);
    signature_bytes[64] = recov_id.to_i32() as u8;
    signature_bytes
}

/// Witness 0 as it is hashed: the signature slot zero filled, any other
/// field kept.
fn witness_without_signature(witness: &Bytes) -> Result<WitnessArgs> {
    let witness_args = if witness.is_empty() {
        WitnessArgs::default()
    } else {
        WitnessArgs::from_slice(witness)
            .map_err(|e| TxBuildError::MalformedDraft(format!("invalid witness 0: {}", e)))?
    };
    Ok(witness_args
        .as_builder()
        .lock(Some(Bytes::from(vec![0u8; SECP_SIGNATURE_SIZE])).pack())
        .build())
}

/// The sighash-all message of the signer's lock group.
pub fn signing_message(skeleton: &TxSkeleton) -> Result<H256> {
    let group = skeleton.signer_group();
    if group.first() != Some(&0) {
        return Err(TxBuildError::MalformedDraft(
            "signer inputs are not at the front".to_string(),
        ));
    }
    let witness_of = |idx: usize| skeleton.witnesses.get(idx).cloned().unwrap_or_default();
    let init_witness = witness_without_signature(&witness_of(0))?.as_bytes();
    let tx = skeleton.to_transaction_view();

    let mut blake2b = new_blake2b();
    blake2b.update(tx.hash().as_slice());
    blake2b.update(&(init_witness.len() as u64).to_le_bytes());
    blake2b.update(&init_witness);
    for idx in group.into_iter().skip(1) {
        let other_witness = witness_of(idx);
        blake2b.update(&(other_witness.len() as u64).to_le_bytes());
        blake2b.update(&other_witness);
    }
    for outter_witness in skeleton.witnesses.iter().skip(skeleton.inputs.len()) {
        blake2b.update(&(outter_witness.len() as u64).to_le_bytes());
        blake2b.update(outter_witness);
    }
    let mut message = [0u8; 32];
    blake2b.finalize(&mut message);
    Ok(H256::from(message))
}

/// Signs the skeleton and puts the signature into witness 0.
pub fn seal<S: KeySigner + ?Sized>(skeleton: TxSkeleton, signer: &S) -> Result<TransactionView> {
    let message = signing_message(&skeleton)?;
    let signature = signer.sign_recoverable(&message)?;
    let init_witness = skeleton.witnesses.first().cloned().unwrap_or_default();
    let witness = witness_without_signature(&init_witness)?
        .as_builder()
        .lock(Some(Bytes::from(signature.to_vec())).pack())
        .build();
    Ok(skeleton
        .with_witness(0, witness.as_bytes())
        .to_transaction_view())
}
