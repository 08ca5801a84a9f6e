//! Sum types: abstract TL types with more than one concrete constructor.
//! The constructor CRC selects the variant at decode time; serialization
//! just forwards to the inner concrete type, which already writes its own
//! CRC prefix.
use crate::deserialize::{Buffer, Result as DeResult};
use crate::serializable::Serializable;
use crate::{Deserializable, Identifiable};

use super::types;

/// `ResPQ`: single-constructor sum type, kept as an enum so handshake code
/// can match on it the same way it matches every other server reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ResPq {
    Pq(types::ResPQ),
}

impl Serializable for ResPq {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Pq(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for ResPq {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::ResPQ::CONSTRUCTOR_ID => Ok(Self::Pq(types::ResPQ::deserialize_fields(buf)?)),
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `P_Q_inner_data`: the plaintext RSA-encrypts into `encrypted_data`.
#[derive(Debug, Clone, PartialEq)]
pub enum PQInnerData {
    Data(types::PQInnerData),
}

impl Serializable for PQInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Data(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for PQInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::PQInnerData::CONSTRUCTOR_ID => {
                Ok(Self::Data(types::PQInnerData::deserialize_fields(buf)?))
            }
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `Server_DH_Params`: either the server accepted the handshake and
/// returned an encrypted answer, or it rejected the proposed nonce.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerDhParams {
    Ok(types::ServerDHParamsOk),
    Fail(types::ServerDHParamsFail),
}

impl Serializable for ServerDhParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Ok(x) => x.serialize(buf),
            Self::Fail(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for ServerDhParams {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::ServerDHParamsOk::CONSTRUCTOR_ID => {
                Ok(Self::Ok(types::ServerDHParamsOk::deserialize_fields(buf)?))
            }
            types::ServerDHParamsFail::CONSTRUCTOR_ID => Ok(Self::Fail(
                types::ServerDHParamsFail::deserialize_fields(buf)?,
            )),
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `Server_DH_inner_data`: decrypted from `encrypted_answer` once the AES
/// key derived from the nonces is known.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerDhInnerData {
    Data(types::ServerDHInnerData),
}

impl Serializable for ServerDhInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Data(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for ServerDhInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::ServerDHInnerData::CONSTRUCTOR_ID => Ok(Self::Data(
                types::ServerDHInnerData::deserialize_fields(buf)?,
            )),
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `Client_DH_Inner_Data`: the client's half of the DH exchange, encrypted
/// the same way as `Server_DH_inner_data` before being sent back.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientDhInnerData {
    Data(types::ClientDHInnerData),
}

impl Serializable for ClientDhInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Data(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for ClientDhInnerData {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::ClientDHInnerData::CONSTRUCTOR_ID => Ok(Self::Data(
                types::ClientDHInnerData::deserialize_fields(buf)?,
            )),
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `Set_client_DH_params_answer`: the three possible outcomes of proposing
/// a DH key, mirroring the state machine in the handshake.
#[derive(Debug, Clone, PartialEq)]
pub enum SetClientDhParamsAnswer {
    DhGenOk(types::DhGenOk),
    DhGenRetry(types::DhGenRetry),
    DhGenFail(types::DhGenFail),
}

impl Serializable for SetClientDhParamsAnswer {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::DhGenOk(x) => x.serialize(buf),
            Self::DhGenRetry(x) => x.serialize(buf),
            Self::DhGenFail(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for SetClientDhParamsAnswer {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::DhGenOk::CONSTRUCTOR_ID => {
                Ok(Self::DhGenOk(types::DhGenOk::deserialize_fields(buf)?))
            }
            types::DhGenRetry::CONSTRUCTOR_ID => {
                Ok(Self::DhGenRetry(types::DhGenRetry::deserialize_fields(buf)?))
            }
            types::DhGenFail::CONSTRUCTOR_ID => {
                Ok(Self::DhGenFail(types::DhGenFail::deserialize_fields(buf)?))
            }
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `RpcError`: single-constructor sum type wrapping the server's RPC
/// failure description.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    Error(types::RpcError),
}

impl Serializable for RpcError {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Error(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::RpcError::CONSTRUCTOR_ID => {
                Ok(Self::Error(types::RpcError::deserialize_fields(buf)?))
            }
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `BadMsgNotification`: the server's complaint about a previously sent
/// message, with or without an accompanying salt update.
#[derive(Debug, Clone, PartialEq)]
pub enum BadMsgNotification {
    Notification(types::BadMsgNotification),
    BadServerSalt(types::BadServerSalt),
}

impl Serializable for BadMsgNotification {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Notification(x) => x.serialize(buf),
            Self::BadServerSalt(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for BadMsgNotification {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::BadMsgNotification::CONSTRUCTOR_ID => Ok(Self::Notification(
                types::BadMsgNotification::deserialize_fields(buf)?,
            )),
            types::BadServerSalt::CONSTRUCTOR_ID => Ok(Self::BadServerSalt(
                types::BadServerSalt::deserialize_fields(buf)?,
            )),
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `MsgsAck`: single-constructor sum type acknowledging receipt of a set
/// of message IDs.
#[derive(Debug, Clone, PartialEq)]
pub enum MsgsAck {
    Ack(types::MsgsAck),
}

impl Serializable for MsgsAck {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Ack(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for MsgsAck {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::MsgsAck::CONSTRUCTOR_ID => {
                Ok(Self::Ack(types::MsgsAck::deserialize_fields(buf)?))
            }
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `NewSession`: single-constructor sum type announcing a new session was
/// created server-side, carrying the salt to use from then on.
#[derive(Debug, Clone, PartialEq)]
pub enum NewSession {
    Created(types::NewSessionCreated),
}

impl Serializable for NewSession {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Created(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for NewSession {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::NewSessionCreated::CONSTRUCTOR_ID => Ok(Self::Created(
                types::NewSessionCreated::deserialize_fields(buf)?,
            )),
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

/// `Pong`: single-constructor sum type answering a keepalive ping.
#[derive(Debug, Clone, PartialEq)]
pub enum Pong {
    Pong(types::Pong),
}

impl Serializable for Pong {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Pong(x) => x.serialize(buf),
        }
    }
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        match id {
            types::Pong::CONSTRUCTOR_ID => Ok(Self::Pong(types::Pong::deserialize_fields(buf)?)),
            _ => Err(crate::deserialize::Error::UnexpectedConstructor { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_dh_params_ok_and_fail_share_an_enum() {
        let ok = types::ServerDHParamsOk {
            nonce: [1; 16],
            server_nonce: [2; 16],
            encrypted_answer: vec![9, 9, 9],
        };
        let wrapped = ServerDhParams::Ok(ok.clone());
        assert_eq!(
            ServerDhParams::from_bytes(&wrapped.to_bytes()).unwrap(),
            ServerDhParams::Ok(ok)
        );

        let fail = types::ServerDHParamsFail {
            nonce: [3; 16],
            server_nonce: [4; 16],
            new_nonce_hash3: [5; 16],
        };
        let wrapped = ServerDhParams::Fail(fail.clone());
        assert_eq!(
            ServerDhParams::from_bytes(&wrapped.to_bytes()).unwrap(),
            ServerDhParams::Fail(fail)
        );
    }

    #[test]
    fn set_client_dh_params_answer_round_trips_all_three_variants() {
        let ok = SetClientDhParamsAnswer::DhGenOk(types::DhGenOk {
            nonce: [1; 16],
            server_nonce: [2; 16],
            new_nonce_hash1: [3; 16],
        });
        assert_eq!(
            SetClientDhParamsAnswer::from_bytes(&ok.to_bytes()).unwrap(),
            ok
        );

        let retry = SetClientDhParamsAnswer::DhGenRetry(types::DhGenRetry {
            nonce: [1; 16],
            server_nonce: [2; 16],
            new_nonce_hash2: [3; 16],
        });
        assert_eq!(
            SetClientDhParamsAnswer::from_bytes(&retry.to_bytes()).unwrap(),
            retry
        );

        let fail = SetClientDhParamsAnswer::DhGenFail(types::DhGenFail {
            nonce: [1; 16],
            server_nonce: [2; 16],
            new_nonce_hash3: [3; 16],
        });
        assert_eq!(
            SetClientDhParamsAnswer::from_bytes(&fail.to_bytes()).unwrap(),
            fail
        );
    }

    #[test]
    fn bad_msg_notification_round_trips_both_variants() {
        let plain = BadMsgNotification::Notification(types::BadMsgNotification {
            bad_msg_id: 1,
            bad_msg_seqno: 2,
            error_code: 16,
        });
        assert_eq!(
            BadMsgNotification::from_bytes(&plain.to_bytes()).unwrap(),
            plain
        );

        let salt = BadMsgNotification::BadServerSalt(types::BadServerSalt {
            bad_msg_id: 1,
            bad_msg_seqno: 2,
            error_code: 48,
            new_server_salt: 123,
        });
        assert_eq!(
            BadMsgNotification::from_bytes(&salt.to_bytes()).unwrap(),
            salt
        );
    }

    #[test]
    fn pong_round_trips() {
        let pong = Pong::Pong(types::Pong {
            msg_id: 123,
            ping_id: 456,
        });
        assert_eq!(Pong::from_bytes(&pong.to_bytes()).unwrap(), pong);
    }
}
