pub mod otp_requests;

pub use otp_requests as otp_request_entity;
