#![allow(dead_code)]

pub mod transfer_service;
