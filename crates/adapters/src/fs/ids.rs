use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use imgrater_application::IdGenerator;
use imgrater_domain::OpaqueId;
use uuid::Uuid;

const ID_LENGTH: usize = 14;

/// URL-safe ids cut from a base64-encoded random UUID.
#[derive(Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> OpaqueId {
        let mut encoded = URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes());
        encoded.truncate(ID_LENGTH);
        OpaqueId::new(encoded)
    }
}
