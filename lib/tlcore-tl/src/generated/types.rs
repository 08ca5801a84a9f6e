//! Concrete (non-sum) constructors: the handshake's intermediate structures
//! and the session runtime's core service objects, plus a bitflag-optional
//! fixture (`InputThemeObj`/`InstallThemeParams`) proving out the bitset
//! mechanism that none of the fixed constructors above happen to need.
//!
//! Binary-payload fields (`pq`, `p`, `q`, `dh_prime`, `g_a`, `g_b`,
//! `encrypted_answer`, `encrypted_data`) are typed as `Vec<u8>`, never
//! `String` — these carry RSA ciphertext and big-endian integers, and
//! round-tripping them through a UTF-8 string would silently corrupt any
//! byte sequence that isn't valid UTF-8.
use crate::deserialize::{Buffer, Result as DeResult};
use crate::serializable::Serializable;
use crate::{Deserializable, Identifiable};

/// `resPQ#05162463 nonce:int128 server_nonce:int128 pq:string
/// server_public_key_fingerprints:Vector<long> = ResPQ;`
#[derive(Debug, Clone, PartialEq)]
pub struct ResPQ {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub pq: Vec<u8>,
    pub server_public_key_fingerprints: Vec<i64>,
}

impl Identifiable for ResPQ {
    const CONSTRUCTOR_ID: u32 = 0x0516_2463;
}

impl ResPQ {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            pq: Deserializable::deserialize(buf)?,
            server_public_key_fingerprints: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for ResPQ {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.pq.serialize(buf);
        self.server_public_key_fingerprints.serialize(buf);
    }
}

impl Deserializable for ResPQ {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `p_q_inner_data#83c95aec pq:string p:string q:string nonce:int128
/// server_nonce:int128 new_nonce:int256 = P_Q_inner_data;`
#[derive(Debug, Clone, PartialEq)]
pub struct PQInnerData {
    pub pq: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce: [u8; 32],
}

impl Identifiable for PQInnerData {
    const CONSTRUCTOR_ID: u32 = 0x83c9_5aec;
}

impl PQInnerData {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            pq: Deserializable::deserialize(buf)?,
            p: Deserializable::deserialize(buf)?,
            q: Deserializable::deserialize(buf)?,
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for PQInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.pq.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce.serialize(buf);
    }
}

impl Deserializable for PQInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `server_DH_params_fail#79cb045d nonce:int128 server_nonce:int128
/// new_nonce_hash3:int128 = Server_DH_Params;`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDHParamsFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash3: [u8; 16],
}

impl Identifiable for ServerDHParamsFail {
    const CONSTRUCTOR_ID: u32 = 0x79cb_045d;
}

impl ServerDHParamsFail {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash3: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for ServerDHParamsFail {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash3.serialize(buf);
    }
}

impl Deserializable for ServerDHParamsFail {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `server_DH_params_ok#d0e8075c nonce:int128 server_nonce:int128
/// encrypted_answer:string = Server_DH_Params;`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDHParamsOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_answer: Vec<u8>,
}

impl Identifiable for ServerDHParamsOk {
    const CONSTRUCTOR_ID: u32 = 0xd0e8_075c;
}

impl ServerDHParamsOk {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            encrypted_answer: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for ServerDHParamsOk {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.encrypted_answer.serialize(buf);
    }
}

impl Deserializable for ServerDHParamsOk {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `server_DH_inner_data#b5890dba nonce:int128 server_nonce:int128 g:int
/// dh_prime:string g_a:string server_time:int = Server_DH_inner_data;`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDHInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub g: i32,
    pub dh_prime: Vec<u8>,
    pub g_a: Vec<u8>,
    pub server_time: i32,
}

impl Identifiable for ServerDHInnerData {
    const CONSTRUCTOR_ID: u32 = 0xb589_0dba;
}

impl ServerDHInnerData {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            g: Deserializable::deserialize(buf)?,
            dh_prime: Deserializable::deserialize(buf)?,
            g_a: Deserializable::deserialize(buf)?,
            server_time: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for ServerDHInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.g.serialize(buf);
        self.dh_prime.serialize(buf);
        self.g_a.serialize(buf);
        self.server_time.serialize(buf);
    }
}

impl Deserializable for ServerDHInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `client_DH_inner_data#6643b654 nonce:int128 server_nonce:int128
/// retry_id:long g_b:string = Client_DH_Inner_Data;`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDHInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub retry_id: i64,
    pub g_b: Vec<u8>,
}

impl Identifiable for ClientDHInnerData {
    const CONSTRUCTOR_ID: u32 = 0x6643_b654;
}

impl ClientDHInnerData {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            retry_id: Deserializable::deserialize(buf)?,
            g_b: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for ClientDHInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.retry_id.serialize(buf);
        self.g_b.serialize(buf);
    }
}

impl Deserializable for ClientDHInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `dh_gen_ok#3bcbf734 nonce:int128 server_nonce:int128
/// new_nonce_hash1:int128 = Set_client_DH_params_answer;`
#[derive(Debug, Clone, PartialEq)]
pub struct DhGenOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash1: [u8; 16],
}

impl Identifiable for DhGenOk {
    const CONSTRUCTOR_ID: u32 = 0x3bcb_f734;
}

impl DhGenOk {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash1: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for DhGenOk {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash1.serialize(buf);
    }
}

impl Deserializable for DhGenOk {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `dh_gen_retry#46dc1fb9 nonce:int128 server_nonce:int128
/// new_nonce_hash2:int128 = Set_client_DH_params_answer;`
#[derive(Debug, Clone, PartialEq)]
pub struct DhGenRetry {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash2: [u8; 16],
}

impl Identifiable for DhGenRetry {
    const CONSTRUCTOR_ID: u32 = 0x46dc_1fb9;
}

impl DhGenRetry {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash2: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for DhGenRetry {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash2.serialize(buf);
    }
}

impl Deserializable for DhGenRetry {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `dh_gen_fail#a69dae02 nonce:int128 server_nonce:int128
/// new_nonce_hash3:int128 = Set_client_DH_params_answer;`
#[derive(Debug, Clone, PartialEq)]
pub struct DhGenFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash3: [u8; 16],
}

impl Identifiable for DhGenFail {
    const CONSTRUCTOR_ID: u32 = 0xa69d_ae02;
}

impl DhGenFail {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            new_nonce_hash3: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for DhGenFail {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash3.serialize(buf);
    }
}

impl Deserializable for DhGenFail {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `rpc_error#2144ca19 error_code:int error_message:string = RpcError;`
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub error_code: i32,
    pub error_message: String,
}

impl Identifiable for RpcError {
    const CONSTRUCTOR_ID: u32 = 0x2144_ca19;
}

impl RpcError {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            error_code: Deserializable::deserialize(buf)?,
            error_message: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for RpcError {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.error_code.serialize(buf);
        self.error_message.serialize(buf);
    }
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `bad_msg_notification#a7eff811 bad_msg_id:long bad_msg_seqno:int
/// error_code:int = BadMsgNotification;`
#[derive(Debug, Clone, PartialEq)]
pub struct BadMsgNotification {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
}

impl Identifiable for BadMsgNotification {
    const CONSTRUCTOR_ID: u32 = 0xa7ef_f811;
}

impl BadMsgNotification {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            bad_msg_id: Deserializable::deserialize(buf)?,
            bad_msg_seqno: Deserializable::deserialize(buf)?,
            error_code: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for BadMsgNotification {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
    }
}

impl Deserializable for BadMsgNotification {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `bad_server_salt#edab447b bad_msg_id:long bad_msg_seqno:int
/// error_code:int new_server_salt:long = BadMsgNotification;`
#[derive(Debug, Clone, PartialEq)]
pub struct BadServerSalt {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
    pub new_server_salt: i64,
}

impl Identifiable for BadServerSalt {
    const CONSTRUCTOR_ID: u32 = 0xedab_447b;
}

impl BadServerSalt {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            bad_msg_id: Deserializable::deserialize(buf)?,
            bad_msg_seqno: Deserializable::deserialize(buf)?,
            error_code: Deserializable::deserialize(buf)?,
            new_server_salt: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for BadServerSalt {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
        self.new_server_salt.serialize(buf);
    }
}

impl Deserializable for BadServerSalt {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `msgs_ack#62d6b459 msg_ids:Vector<long> = MsgsAck;`
#[derive(Debug, Clone, PartialEq)]
pub struct MsgsAck {
    pub msg_ids: Vec<i64>,
}

impl Identifiable for MsgsAck {
    const CONSTRUCTOR_ID: u32 = 0x62d6_b459;
}

impl MsgsAck {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_ids: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for MsgsAck {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_ids.serialize(buf);
    }
}

impl Deserializable for MsgsAck {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `new_session_created#9ec20908 first_msg_id:long unique_id:long
/// server_salt:long = NewSession;`
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionCreated {
    pub first_msg_id: i64,
    pub unique_id: i64,
    pub server_salt: i64,
}

impl Identifiable for NewSessionCreated {
    const CONSTRUCTOR_ID: u32 = 0x9ec2_0908;
}

impl NewSessionCreated {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            first_msg_id: Deserializable::deserialize(buf)?,
            unique_id: Deserializable::deserialize(buf)?,
            server_salt: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for NewSessionCreated {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.first_msg_id.serialize(buf);
        self.unique_id.serialize(buf);
        self.server_salt.serialize(buf);
    }
}

impl Deserializable for NewSessionCreated {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `pong#347773c5 msg_id:long ping_id:long = Pong;`
#[derive(Debug, Clone, PartialEq)]
pub struct Pong {
    pub msg_id: i64,
    pub ping_id: i64,
}

impl Identifiable for Pong {
    const CONSTRUCTOR_ID: u32 = 0x3477_73c5;
}

impl Pong {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            msg_id: Deserializable::deserialize(buf)?,
            ping_id: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for Pong {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.msg_id.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// Returns whether a bitflag-optional field counts as present: `Some` and
/// not equal to the field's own zero value. Both the bitset bit and the
/// field's bytes are gated on this same check, so a struct can never end
/// up with a bit set but no bytes following it, or vice versa.
pub(crate) fn flag_is_present<T: Default + PartialEq>(value: &Option<T>) -> bool {
    value.as_ref().map_or(false, |v| *v != T::default())
}

/// None of the fixed handshake/session constructors above happen to use a
/// bitflag, so this pair exercises the mechanism directly: a `flags:#`
/// bitset field plus per-field conditional presence. Modeled on
/// `account.installTheme#7ae43737 dark:flags.0?true format:flags.1?string
/// theme:flags.1?InputThemeObj = Bool;`, whose encoding is a known-good
/// byte-exact fixture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputThemeObj {
    pub id: i64,
    pub access_hash: i64,
}

impl Identifiable for InputThemeObj {
    const CONSTRUCTOR_ID: u32 = 0x3c56_93e9;
}

impl InputThemeObj {
    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        Ok(Self {
            id: Deserializable::deserialize(buf)?,
            access_hash: Deserializable::deserialize(buf)?,
        })
    }
}

impl Serializable for InputThemeObj {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.id.serialize(buf);
        self.access_hash.serialize(buf);
    }
}

impl Deserializable for InputThemeObj {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

/// `dark` is `flag:0,encoded_in_bitflag`: its value IS the bit, no bytes
/// are emitted for it. `format` and `theme` both gate on bit 1, and each
/// is considered present only when it holds something other than that
/// field's own zero value (an empty string, a default-valued `InputThemeObj`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstallThemeParams {
    pub dark: bool,
    pub format: Option<String>,
    pub theme: Option<InputThemeObj>,
}

impl Identifiable for InstallThemeParams {
    const CONSTRUCTOR_ID: u32 = 0x7ae4_3737;
}

impl InstallThemeParams {
    fn bitset(&self) -> u32 {
        let mut flags = 0u32;
        if self.dark {
            flags |= 1 << 0;
        }
        if flag_is_present(&self.format) || flag_is_present(&self.theme) {
            flags |= 1 << 1;
        }
        flags
    }

    pub(crate) fn deserialize_fields(buf: Buffer) -> DeResult<Self> {
        let flags = u32::deserialize(buf)?;
        let dark = flags & (1 << 0) != 0;
        let format = if flags & (1 << 1) != 0 {
            Some(Deserializable::deserialize(buf)?)
        } else {
            None
        };
        let theme = if flags & (1 << 1) != 0 {
            Some(Deserializable::deserialize(buf)?)
        } else {
            None
        };
        Ok(Self {
            dark,
            format,
            theme,
        })
    }
}

impl Serializable for InstallThemeParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.bitset().serialize(buf);
        if flag_is_present(&self.format) {
            self.format.as_ref().unwrap().serialize(buf);
        }
        if flag_is_present(&self.theme) {
            self.theme.as_ref().unwrap().serialize(buf);
        }
    }
}

impl Deserializable for InstallThemeParams {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Self::deserialize_fields(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pong_round_trips() {
        let pong = Pong {
            msg_id: 123,
            ping_id: 456,
        };
        let bytes = pong.to_bytes();
        assert_eq!(Pong::from_bytes(&bytes).unwrap(), pong);
    }

    #[test]
    fn msgs_ack_round_trips_with_empty_and_populated_vectors() {
        let empty = MsgsAck { msg_ids: vec![] };
        assert_eq!(MsgsAck::from_bytes(&empty.to_bytes()).unwrap(), empty);

        let some = MsgsAck {
            msg_ids: vec![1, 2, 3],
        };
        assert_eq!(MsgsAck::from_bytes(&some.to_bytes()).unwrap(), some);
    }

    #[test]
    fn rpc_error_preserves_non_ascii_message() {
        let err = RpcError {
            error_code: 400,
            error_message: "PHONE_CODE_INVALID".into(),
        };
        assert_eq!(RpcError::from_bytes(&err.to_bytes()).unwrap(), err);
    }

    #[test]
    fn binary_payload_fields_survive_non_utf8_bytes() {
        // pq/p/q/encrypted_answer/etc. carry arbitrary bytes, not text;
        // 0xff is never valid as a UTF-8 lead byte, so this would be
        // mangled if these fields were typed as `String`.
        let res_pq = ResPQ {
            nonce: [0; 16],
            server_nonce: [0; 16],
            pq: vec![0xff, 0x00, 0xfe, 0x80],
            server_public_key_fingerprints: vec![1],
        };
        assert_eq!(ResPQ::from_bytes(&res_pq.to_bytes()).unwrap(), res_pq);
    }

    #[test]
    fn server_dh_params_ok_and_fail_share_an_enum() {
        let ok = ServerDHParamsOk {
            nonce: [1; 16],
            server_nonce: [2; 16],
            encrypted_answer: vec![9, 9, 9],
        };
        let wrapped = crate::generated::enums::ServerDhParams::Ok(ok.clone());
        assert_eq!(
            crate::generated::enums::ServerDhParams::from_bytes(&wrapped.to_bytes()).unwrap(),
            crate::generated::enums::ServerDhParams::Ok(ok)
        );

        let fail = ServerDHParamsFail {
            nonce: [3; 16],
            server_nonce: [4; 16],
            new_nonce_hash3: [5; 16],
        };
        let wrapped = crate::generated::enums::ServerDhParams::Fail(fail.clone());
        assert_eq!(
            crate::generated::enums::ServerDhParams::from_bytes(&wrapped.to_bytes()).unwrap(),
            crate::generated::enums::ServerDhParams::Fail(fail)
        );
    }

    #[test]
    fn bitflag_struct_encodes_byte_exact() {
        let value = InstallThemeParams {
            dark: true,
            format: Some("abc".into()),
            theme: Some(InputThemeObj {
                id: 123,
                access_hash: 321,
            }),
        };

        assert_eq!(
            value.to_bytes(),
            [
                0x37, 0x37, 0xe4, 0x7a, 0x03, 0x00, 0x00, 0x00, 0x03, 0x61, 0x62, 0x63, 0xe9,
                0x93, 0x56, 0x3c, 0x7b, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x41, 0x01,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            ],
        );
        assert_eq!(InstallThemeParams::from_bytes(&value.to_bytes()).unwrap(), value);
    }

    #[test]
    fn bitflag_struct_round_trips_with_one_field_absent() {
        let value = InstallThemeParams {
            dark: false,
            format: Some("hi".into()),
            theme: None,
        };
        assert_eq!(InstallThemeParams::from_bytes(&value.to_bytes()).unwrap(), value);
    }

    #[test]
    fn zero_value_optional_clears_bit_and_omits_bytes() {
        let all_defaults = InstallThemeParams {
            dark: false,
            format: Some(String::new()),
            theme: Some(InputThemeObj::default()),
        };

        assert_eq!(all_defaults.bitset(), 0);
        assert_eq!(
            all_defaults.to_bytes(),
            [0x37, 0x37, 0xe4, 0x7a, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            InstallThemeParams::from_bytes(&all_defaults.to_bytes()).unwrap(),
            InstallThemeParams::default()
        );
    }
}
