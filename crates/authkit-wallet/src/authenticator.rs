//! Nonce challenge and signature response.
//!
//! A signed-in user proves control of a wallet by signing
//! `sign_message_prefix + nonce`. Two proof encodings are accepted:
//!
//! 1. A detached ed25519 signature over the challenge bytes (base58, 64 bytes).
//! 2. A serialized transaction (base58 or base64) with exactly one signer,
//!    that signer being the claimed address, and a final instruction whose
//!    data is exactly the challenge bytes.
//!
//! Unverified proofs never report which check failed.

use std::sync::Arc;

use authkit_core::{UserId, WalletAddress};
use authkit_store::UserStore;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::Rng;

use crate::config::WalletConfig;
use crate::error::{AuthFailure, Result};
use crate::transaction::{Transaction, SIGNATURE_LEN};
use crate::verifier::{Ed25519Verifier, SignatureVerifier};

/// Number of random bytes in a nonce.
pub const NONCE_BYTES: usize = 32;

/// Issues wallet challenges and checks the responses.
pub struct WalletAuthenticator<S: UserStore, V: SignatureVerifier = Ed25519Verifier> {
    store: Arc<S>,
    verifier: V,
    config: WalletConfig,
}

impl<S: UserStore> WalletAuthenticator<S> {
    /// Create an authenticator using ed25519 verification.
    #[must_use]
    pub const fn new(store: Arc<S>, config: WalletConfig) -> Self {
        Self::with_verifier(store, Ed25519Verifier, config)
    }
}

impl<S: UserStore, V: SignatureVerifier> WalletAuthenticator<S, V> {
    /// Create an authenticator with a custom verifier.
    #[must_use]
    pub const fn with_verifier(store: Arc<S>, verifier: V, config: WalletConfig) -> Self {
        Self {
            store,
            verifier,
            config,
        }
    }

    /// The challenge configuration.
    #[must_use]
    pub const fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Generate a fresh nonce for the user and return the challenge to sign.
    ///
    /// Any previously issued challenge for the user stops verifying.
    ///
    /// # Errors
    ///
    /// Returns an error if the nonce cannot be stored.
    pub async fn issue_challenge(&self, user_id: &UserId) -> Result<String> {
        let nonce = generate_nonce();
        self.store.set_nonce(user_id, &nonce).await?;

        tracing::debug!(%user_id, "Issued wallet challenge");
        Ok(self.config.challenge(&nonce))
    }

    /// Check a signed challenge for `address`.
    ///
    /// Returns `Ok(false)` for any proof that does not verify. A verified
    /// proof consumes the nonce it was checked against; if that nonce was
    /// replaced or consumed in the meantime the proof is stale and the
    /// result is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` if no challenge is outstanding,
    /// `MalformedTransaction` if `signature` cannot be decoded, or a store
    /// error.
    pub async fn verify_response(
        &self,
        user_id: &UserId,
        address: &WalletAddress,
        signature: &str,
    ) -> Result<bool> {
        let Some(nonce) = self.store.get_nonce(user_id).await? else {
            return Err(AuthFailure::user_not_found().into());
        };
        let challenge = self.config.challenge(&nonce);

        if !self.check_proof(challenge.as_bytes(), address, signature)? {
            tracing::debug!(%user_id, "Wallet proof rejected");
            return Ok(false);
        }

        if !self.store.take_nonce_if(user_id, &nonce).await? {
            tracing::debug!(%user_id, "Wallet proof for a superseded challenge");
            return Ok(false);
        }

        tracing::debug!(%user_id, %address, "Wallet proof verified");
        Ok(true)
    }

    /// Verify a signed challenge and record `address` as the user's wallet.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignature` if the proof does not verify, plus every
    /// error [`verify_response`](Self::verify_response) returns.
    pub async fn link_wallet(
        &self,
        user_id: &UserId,
        address: &WalletAddress,
        signature: &str,
    ) -> Result<()> {
        if !self.verify_response(user_id, address, signature).await? {
            return Err(AuthFailure::invalid_signature().into());
        }

        self.store.set_wallet_address(user_id, address).await?;
        tracing::info!(%user_id, %address, "Wallet linked");
        Ok(())
    }

    fn check_proof(
        &self,
        challenge: &[u8],
        address: &WalletAddress,
        signature: &str,
    ) -> std::result::Result<bool, AuthFailure> {
        let base58 = bs58::decode(signature).into_vec().ok();

        if let Some(bytes) = base58.as_deref().filter(|b| b.len() == SIGNATURE_LEN) {
            return Ok(self
                .verifier
                .verify_detached(challenge, bytes, address.as_bytes()));
        }

        // Base64 output can consist solely of base58 characters, so a failed
        // parse of the base58 bytes still falls back to base64.
        let from_base58 = base58.map(|bytes| Transaction::parse(&bytes));
        let transaction = match from_base58 {
            Some(Ok(transaction)) => transaction,
            Some(Err(base58_err)) => match STANDARD.decode(signature) {
                Ok(bytes) => Transaction::parse(&bytes),
                Err(_) => Err(base58_err),
            }
            .map_err(|e| AuthFailure::malformed_transaction(format!("invalid transaction: {e}")))?,
            None => {
                let bytes = STANDARD.decode(signature).map_err(|_| {
                    AuthFailure::malformed_transaction("signature is neither base58 nor base64")
                })?;
                Transaction::parse(&bytes).map_err(|e| {
                    AuthFailure::malformed_transaction(format!("invalid transaction: {e}"))
                })?
            }
        };

        Ok(self.check_transaction(&transaction, challenge, address))
    }

    fn check_transaction(
        &self,
        transaction: &Transaction,
        challenge: &[u8],
        address: &WalletAddress,
    ) -> bool {
        let [signature] = transaction.signatures.as_slice() else {
            return false;
        };
        if transaction.message.header.num_required_signatures != 1 {
            return false;
        }
        if transaction.signer(0) != Some(address.as_bytes()) {
            return false;
        }
        let payload_matches = transaction
            .message
            .instructions
            .last()
            .is_some_and(|ix| ix.data == challenge);
        if !payload_matches {
            return false;
        }

        self.verifier
            .verify_detached(transaction.message_bytes(), signature, address.as_bytes())
    }
}

fn generate_nonce() -> String {
    let bytes: [u8; NONCE_BYTES] = rand::thread_rng().gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthFailureKind, WalletError};
    use crate::transaction::{Message, MessageVersion};
    use authkit_store::MemoryStore;
    use ed25519_dalek::{Signer, SigningKey};

    const PREFIX: &str = "Sign in to AuthKit: ";
    const MEMO_PROGRAM: [u8; 32] = [0x11; 32];

    struct Fixture {
        store: Arc<MemoryStore>,
        auth: WalletAuthenticator<MemoryStore>,
        user: UserId,
        key: SigningKey,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let auth = WalletAuthenticator::new(Arc::clone(&store), WalletConfig::new(PREFIX));
            Self {
                store,
                auth,
                user: UserId::new("u1").unwrap(),
                key: SigningKey::from_bytes(&[21; 32]),
            }
        }

        fn address(&self) -> WalletAddress {
            WalletAddress::from_bytes(self.key.verifying_key().to_bytes())
        }

        fn sign_detached(&self, challenge: &str) -> String {
            bs58::encode(self.key.sign(challenge.as_bytes()).to_bytes()).into_string()
        }

        fn sign_transaction(&self, data: &[u8]) -> String {
            let message = Message::with_payload(&[*self.address().as_bytes()], MEMO_PROGRAM, data);
            let tx = Transaction::signed(message, &[&self.key]);
            bs58::encode(tx.to_bytes()).into_string()
        }

        async fn verify(&self, signature: &str) -> Result<bool> {
            self.auth
                .verify_response(&self.user, &self.address(), signature)
                .await
        }
    }

    fn failure_kind(err: &WalletError) -> Option<AuthFailureKind> {
        err.auth_failure().map(|f| f.kind)
    }

    #[tokio::test]
    async fn challenge_is_prefix_plus_stored_nonce() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();

        let nonce = f.store.get_nonce(&f.user).await.unwrap().unwrap();
        assert_eq!(challenge, format!("{PREFIX}{nonce}"));
        assert_eq!(nonce.len(), NONCE_BYTES * 2);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn challenges_are_unique() {
        let f = Fixture::new();
        let first = f.auth.issue_challenge(&f.user).await.unwrap();
        let second = f.auth.issue_challenge(&f.user).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn detached_signature_verifies() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();

        assert!(f.verify(&f.sign_detached(&challenge)).await.unwrap());
    }

    #[tokio::test]
    async fn verified_nonce_cannot_be_replayed() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let signature = f.sign_detached(&challenge);

        assert!(f.verify(&signature).await.unwrap());
        let err = f.verify(&signature).await.unwrap_err();
        assert_eq!(failure_kind(&err), Some(AuthFailureKind::UserNotFound));
    }

    #[tokio::test]
    async fn reissued_challenge_invalidates_previous() {
        let f = Fixture::new();
        let first = f.auth.issue_challenge(&f.user).await.unwrap();
        let stale = f.sign_detached(&first);
        let second = f.auth.issue_challenge(&f.user).await.unwrap();

        assert!(!f.verify(&stale).await.unwrap());
        assert!(f.verify(&f.sign_detached(&second)).await.unwrap());
    }

    #[tokio::test]
    async fn missing_nonce_is_user_not_found() {
        let f = Fixture::new();
        let err = f.verify(&f.sign_detached("anything")).await.unwrap_err();
        assert_eq!(failure_kind(&err), Some(AuthFailureKind::UserNotFound));
    }

    #[tokio::test]
    async fn detached_signature_from_other_key_fails() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let other = SigningKey::from_bytes(&[99; 32]);
        let signature = bs58::encode(other.sign(challenge.as_bytes()).to_bytes()).into_string();

        assert!(!f.verify(&signature).await.unwrap());
        assert!(f.store.get_nonce(&f.user).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn transaction_proof_verifies() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();

        assert!(f
            .verify(&f.sign_transaction(challenge.as_bytes()))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn base64_transaction_proof_verifies() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let message = Message::with_payload(
            &[*f.address().as_bytes()],
            MEMO_PROGRAM,
            challenge.as_bytes(),
        );
        let tx = Transaction::signed(message, &[&f.key]);

        assert!(f.verify(&STANDARD.encode(tx.to_bytes())).await.unwrap());
    }

    #[tokio::test]
    async fn v0_transaction_proof_verifies() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let mut message = Message::with_payload(
            &[*f.address().as_bytes()],
            MEMO_PROGRAM,
            challenge.as_bytes(),
        );
        message.version = MessageVersion::V0;
        let tx = Transaction::signed(message, &[&f.key]);

        assert!(f
            .verify(&bs58::encode(tx.to_bytes()).into_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn transaction_with_two_signers_is_rejected() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let cosigner = SigningKey::from_bytes(&[42; 32]);
        let message = Message::with_payload(
            &[*f.address().as_bytes(), cosigner.verifying_key().to_bytes()],
            MEMO_PROGRAM,
            challenge.as_bytes(),
        );
        let tx = Transaction::signed(message, &[&f.key, &cosigner]);

        assert!(!f
            .verify(&bs58::encode(tx.to_bytes()).into_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn transaction_signed_by_other_wallet_is_rejected() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let other = SigningKey::from_bytes(&[77; 32]);
        let message = Message::with_payload(
            &[other.verifying_key().to_bytes()],
            MEMO_PROGRAM,
            challenge.as_bytes(),
        );
        let tx = Transaction::signed(message, &[&other]);

        assert!(!f
            .verify(&bs58::encode(tx.to_bytes()).into_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn transaction_with_wrong_payload_is_rejected() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let tampered = format!("{challenge}!");

        assert!(!f
            .verify(&f.sign_transaction(tampered.as_bytes()))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn challenge_must_be_in_last_instruction() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let mut message = Message::with_payload(
            &[*f.address().as_bytes()],
            MEMO_PROGRAM,
            challenge.as_bytes(),
        );
        let mut trailing = message.instructions[0].clone();
        trailing.data = b"transfer".to_vec();
        message.instructions.push(trailing);
        let tx = Transaction::signed(message, &[&f.key]);

        assert!(!f
            .verify(&bs58::encode(tx.to_bytes()).into_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn transaction_with_bad_signature_is_rejected() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();
        let message = Message::with_payload(
            &[*f.address().as_bytes()],
            MEMO_PROGRAM,
            challenge.as_bytes(),
        );
        let mut tx = Transaction::signed(message, &[&f.key]);
        tx.signatures[0][0] ^= 0xff;

        assert!(!f
            .verify(&bs58::encode(tx.to_bytes()).into_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn undecodable_proof_is_malformed() {
        let f = Fixture::new();
        f.auth.issue_challenge(&f.user).await.unwrap();

        let err = f.verify("not a signature!").await.unwrap_err();
        assert_eq!(
            failure_kind(&err),
            Some(AuthFailureKind::MalformedTransaction)
        );

        let err = f.verify(&bs58::encode([1_u8, 2, 3]).into_string()).await.unwrap_err();
        assert_eq!(
            failure_kind(&err),
            Some(AuthFailureKind::MalformedTransaction)
        );
    }

    #[tokio::test]
    async fn link_wallet_persists_address() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();

        f.auth
            .link_wallet(&f.user, &f.address(), &f.sign_detached(&challenge))
            .await
            .unwrap();

        assert_eq!(
            f.store.get_wallet_address(&f.user).await.unwrap(),
            Some(f.address())
        );
        assert!(f.store.get_nonce(&f.user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn link_failures_carry_no_detail() {
        let f = Fixture::new();
        let challenge = f.auth.issue_challenge(&f.user).await.unwrap();

        let other = SigningKey::from_bytes(&[77; 32]);
        let wrong_signer = {
            let message = Message::with_payload(
                &[other.verifying_key().to_bytes()],
                MEMO_PROGRAM,
                challenge.as_bytes(),
            );
            bs58::encode(Transaction::signed(message, &[&other]).to_bytes()).into_string()
        };
        let wrong_payload = f.sign_transaction(b"some other challenge");
        let wrong_key = bs58::encode(other.sign(challenge.as_bytes()).to_bytes()).into_string();

        let mut failures = Vec::new();
        for proof in [wrong_signer, wrong_payload, wrong_key] {
            let err = f
                .auth
                .link_wallet(&f.user, &f.address(), &proof)
                .await
                .unwrap_err();
            match err {
                WalletError::Auth(failure) => failures.push(failure),
                WalletError::Store(e) => panic!("unexpected store error: {e}"),
            }
        }

        for failure in &failures {
            assert_eq!(failure, &AuthFailure::invalid_signature());
            let message = failure.message.to_lowercase();
            assert!(!message.contains("signer"));
            assert!(!message.contains("payload"));
            assert!(!message.contains("instruction"));
        }
        assert!(f.store.get_wallet_address(&f.user).await.unwrap().is_none());
    }
}
