//! A process-wide, compile-time table mapping each constructor CRC this
//! crate knows about to its human-readable name. It exists purely for
//! diagnostics (error messages, logging); decoding itself dispatches on CRC
//! through ordinary `match` arms in [`crate::generated`], not through this
//! table.
//!
//! Because the constructor set is fixed at compile time (no runtime schema
//! loading), "registration" is just this literal array, and
//! "re-registration is a fatal error" is checked once by a test rather than
//! at runtime.
use crate::Identifiable;

const NAMES: &[(u32, &str)] = &[
    (crate::generated::types::ResPQ::CONSTRUCTOR_ID, "resPQ"),
    (
        crate::generated::types::PQInnerData::CONSTRUCTOR_ID,
        "p_q_inner_data",
    ),
    (
        crate::generated::types::ServerDHParamsFail::CONSTRUCTOR_ID,
        "server_DH_params_fail",
    ),
    (
        crate::generated::types::ServerDHParamsOk::CONSTRUCTOR_ID,
        "server_DH_params_ok",
    ),
    (
        crate::generated::types::ServerDHInnerData::CONSTRUCTOR_ID,
        "server_DH_inner_data",
    ),
    (
        crate::generated::types::ClientDHInnerData::CONSTRUCTOR_ID,
        "client_DH_inner_data",
    ),
    (
        crate::generated::types::DhGenOk::CONSTRUCTOR_ID,
        "dh_gen_ok",
    ),
    (
        crate::generated::types::DhGenRetry::CONSTRUCTOR_ID,
        "dh_gen_retry",
    ),
    (
        crate::generated::types::DhGenFail::CONSTRUCTOR_ID,
        "dh_gen_fail",
    ),
    (crate::generated::types::RpcError::CONSTRUCTOR_ID, "rpc_error"),
    (
        crate::generated::types::BadMsgNotification::CONSTRUCTOR_ID,
        "bad_msg_notification",
    ),
    (
        crate::generated::types::BadServerSalt::CONSTRUCTOR_ID,
        "bad_server_salt",
    ),
    (crate::generated::types::MsgsAck::CONSTRUCTOR_ID, "msgs_ack"),
    (
        crate::generated::types::NewSessionCreated::CONSTRUCTOR_ID,
        "new_session_created",
    ),
    (crate::generated::types::Pong::CONSTRUCTOR_ID, "pong"),
    (
        crate::generated::functions::ReqPqMulti::CONSTRUCTOR_ID,
        "req_pq_multi",
    ),
    (
        crate::generated::functions::ReqDhParams::CONSTRUCTOR_ID,
        "req_DH_params",
    ),
    (
        crate::generated::functions::SetClientDhParams::CONSTRUCTOR_ID,
        "set_client_DH_params",
    ),
    (crate::generated::functions::Ping::CONSTRUCTOR_ID, "ping"),
];

/// Looks up the human-readable name of a constructor CRC, for use in
/// diagnostics. Unknown CRCs (anything above the TL layer this crate
/// handles) are rendered as their raw hex value instead of a name.
pub fn name_for_id(id: u32) -> String {
    match NAMES.iter().find(|(crc, _)| *crc == id) {
        Some((_, name)) => name.to_string(),
        None => format!("0x{id:08x}"),
    }
}
