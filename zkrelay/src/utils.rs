use alloy::primitives::{B256, U256};
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::error::FieldError;

pub const SUBMIT_PATH: &str = "/api/submitProofToContract";
pub const HEALTH_PATH: &str = "/health";

pub const DOMAIN_SEPARATOR: char = '|';

/// Parses a non-negative decimal integer of arbitrary size.
pub fn parse_decimal(s: &str) -> Result<BigUint, FieldError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::NotDecimal(s.to_string()));
    }
    BigUint::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(|| FieldError::NotDecimal(s.to_string()))
}

/// Converts a decimal string into a big-endian, zero-padded 32-byte word.
pub fn decimal_to_bytes32(s: &str) -> Result<B256, FieldError> {
    let value = parse_decimal(s)?;
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(FieldError::Overflow(s.to_string()));
    }

    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(B256::from(word))
}

/// `"255"` becomes `0x` followed by 62 zeros and `ff`.
pub fn decimal_to_bytes32_hex(s: &str) -> Result<String, FieldError> {
    let word = decimal_to_bytes32(s)?;
    Ok(format!("0x{}", hex::encode(word)))
}

pub fn decimal_to_u256(s: &str) -> Result<U256, FieldError> {
    decimal_to_bytes32(s).map(|word| U256::from_be_bytes(word.0))
}

/// Re-renders a uint256 decimal without surrounding whitespace or leading zeros.
pub fn canonical_decimal(s: &str) -> Result<String, FieldError> {
    decimal_to_u256(s).map(|value| value.to_string())
}

/// True if and only if the value is the integer one. Never fails: anything
/// that is not a decimal integer counts as false.
pub fn is_code_exist(s: &str) -> bool {
    parse_decimal(s)
        .map(|value| value == BigUint::from(1u8))
        .unwrap_or(false)
}

pub fn domain_name(kid: &str, iss: &str, azp: &str) -> String {
    [kid, iss, azp].join(&DOMAIN_SEPARATOR.to_string())
}

pub fn field_to_string<F: PrimeField>(f: F) -> String {
    field_to_biguint(f).to_string()
}

/// Parses a decimal string into a field element, rejecting values that would
/// be reduced modulo the field order.
pub fn field_from_string<F: PrimeField>(s: &str) -> Result<F, FieldError> {
    let value = parse_decimal(s)?;
    let field = F::from_le_bytes_mod_order(&value.to_bytes_le());
    if field_to_biguint(field) != value {
        return Err(FieldError::OutOfField(s.to_string()));
    }
    Ok(field)
}

fn field_to_biguint<F: PrimeField>(f: F) -> BigUint {
    BigUint::from_bytes_le(&f.into_repr().to_bytes_le())
}
