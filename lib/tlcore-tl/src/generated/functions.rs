//! Requests the handshake and session runtime send. Each implements
//! [`crate::RemoteCall`] to tie it to the shape of its response.
use crate::deserialize::{Buffer, Result as DeResult};
use crate::serializable::Serializable;
use crate::{Deserializable, Identifiable, RemoteCall};

use super::enums;
use super::types;

/// `req_pq_multi#be7e8ef1 nonce:int128 = ResPQ;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReqPqMulti {
    pub nonce: [u8; 16],
}

impl Identifiable for ReqPqMulti {
    const CONSTRUCTOR_ID: u32 = 0xbe7e_8ef1;
}

impl Serializable for ReqPqMulti {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
    }
}

impl Deserializable for ReqPqMulti {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
        })
    }
}

impl RemoteCall for ReqPqMulti {
    type Return = enums::ResPq;
}

/// `req_DH_params#d712e4be nonce:int128 server_nonce:int128 p:string
/// q:string public_key_fingerprint:long encrypted_data:string =
/// Server_DH_Params;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReqDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub public_key_fingerprint: i64,
    pub encrypted_data: Vec<u8>,
}

impl Identifiable for ReqDhParams {
    const CONSTRUCTOR_ID: u32 = 0xd712_e4be;
}

impl Serializable for ReqDhParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.public_key_fingerprint.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl Deserializable for ReqDhParams {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            p: Deserializable::deserialize(buf)?,
            q: Deserializable::deserialize(buf)?,
            public_key_fingerprint: Deserializable::deserialize(buf)?,
            encrypted_data: Deserializable::deserialize(buf)?,
        })
    }
}

impl RemoteCall for ReqDhParams {
    type Return = enums::ServerDhParams;
}

/// `set_client_DH_params#f5045f1f nonce:int128 server_nonce:int128
/// encrypted_data:string = Set_client_DH_params_answer;`
#[derive(Debug, Clone, PartialEq)]
pub struct SetClientDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_data: Vec<u8>,
}

impl Identifiable for SetClientDhParams {
    const CONSTRUCTOR_ID: u32 = 0xf504_5f1f;
}

impl Serializable for SetClientDhParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl Deserializable for SetClientDhParams {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            nonce: Deserializable::deserialize(buf)?,
            server_nonce: Deserializable::deserialize(buf)?,
            encrypted_data: Deserializable::deserialize(buf)?,
        })
    }
}

impl RemoteCall for SetClientDhParams {
    type Return = enums::SetClientDhParamsAnswer;
}

/// `ping#7abe77ec ping_id:long = Pong;`
#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    pub ping_id: i64,
}

impl Identifiable for Ping {
    const CONSTRUCTOR_ID: u32 = 0x7abe_77ec;
}

impl Serializable for Ping {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl Deserializable for Ping {
    fn deserialize(buf: Buffer) -> DeResult<Self> {
        let id = u32::deserialize(buf)?;
        if id != Self::CONSTRUCTOR_ID {
            return Err(crate::deserialize::Error::UnexpectedConstructor { id });
        }
        Ok(Self {
            ping_id: Deserializable::deserialize(buf)?,
        })
    }
}

impl RemoteCall for Ping {
    type Return = types::Pong;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn req_pq_multi_round_trips() {
        let req = ReqPqMulti { nonce: [7; 16] };
        assert_eq!(ReqPqMulti::from_bytes(&req.to_bytes()).unwrap(), req);
    }

    #[test]
    fn set_client_dh_params_keeps_arbitrary_encrypted_bytes() {
        let req = SetClientDhParams {
            nonce: [1; 16],
            server_nonce: [2; 16],
            encrypted_data: vec![0x00, 0xff, 0x80, 0x01],
        };
        assert_eq!(
            SetClientDhParams::from_bytes(&req.to_bytes()).unwrap(),
            req
        );
    }
}
