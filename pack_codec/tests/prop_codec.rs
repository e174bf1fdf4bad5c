use pack_codec::{CodecOptions, Endian, Integer, Precision, float, integer, string};
use proptest::prelude::*;

fn endian() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Big), Just(Endian::Little), Just(Endian::Native)]
}

/// Upper bound (exclusive) of the unsigned range for `bytes`
fn unsigned_limit(bytes: usize) -> Integer {
    let mut limit = Integer::from(1);
    for _ in 0..bytes {
        limit = limit * Integer::from(256u32);
    }
    limit
}

proptest! {
    // --- integers that fit round trip under every byte order ---
    #[test]
    fn prop_signed_round_trip(v in any::<i64>(), endian in endian()) {
        let value = Integer::from(v);
        let o = CodecOptions::new().with_bytes(8).with_endian(endian).with_signed(true);
        let raw = integer::encode(&value, &o).unwrap();
        prop_assert_eq!(raw.len(), 8);
        prop_assert_eq!(integer::decode(&raw, &o).unwrap(), value);
    }

    #[test]
    fn prop_unsigned_round_trip(v in any::<u32>(), bytes in 4usize..24, endian in endian()) {
        let value = Integer::from(v);
        let o = CodecOptions::new().with_bytes(bytes).with_endian(endian).with_signed(false);
        let raw = integer::encode(&value, &o).unwrap();
        prop_assert_eq!(raw.len(), bytes);
        prop_assert_eq!(integer::decode(&raw, &o).unwrap(), value);
    }

    // --- the encoding matches the machine layout where one exists ---
    #[test]
    fn prop_matches_native_i32_layout(v in any::<i32>()) {
        let o = CodecOptions::new().with_bytes(4).with_endian(Endian::Native);
        prop_assert_eq!(integer::encode(&Integer::from(v), &o).unwrap(), v.to_ne_bytes().to_vec());
    }

    // --- overflow wraps to the low-order bytes ---
    #[test]
    fn prop_truncation_is_modular(v in any::<u64>(), bytes in 1usize..8) {
        let value = Integer::from(v);
        let o = CodecOptions::new().with_bytes(bytes).with_signed(false);
        let raw = integer::encode(&value, &o).unwrap();
        let expected = &value % &unsigned_limit(bytes);
        prop_assert_eq!(integer::decode(&raw, &o).unwrap(), expected);
    }

    // --- values wider than a machine word ---
    #[test]
    fn prop_wide_round_trip(hi in any::<u64>(), lo in any::<u64>(), negative in any::<bool>(), extra in 1usize..8) {
        let mut value = Integer::from(hi) * unsigned_limit(8) + Integer::from(lo);
        if negative {
            value = -value;
        }
        let o = CodecOptions::new().with_bytes(16 + extra).with_signed(true);
        let raw = integer::encode(&value, &o).unwrap();
        prop_assert_eq!(integer::decode(&raw, &o).unwrap(), value);
    }

    // --- unset width always holds the value under the inferred signedness ---
    #[test]
    fn prop_default_width_fits(v in any::<i128>()) {
        let value = Integer::from(v);
        let raw = integer::encode(&value, &CodecOptions::new()).unwrap();
        prop_assert!(raw.len() >= integer::DEFAULT_WIDTH);
        prop_assert_eq!(integer::decode_with(&raw, Endian::Big, v < 0), value);
    }

    // --- floats ---
    #[test]
    fn prop_double_round_trip(v in any::<f64>().prop_filter("finite", |v| v.is_finite()), endian in endian()) {
        let o = CodecOptions::new().with_precision(Precision::Double).with_endian(endian);
        prop_assert_eq!(float::decode(&float::encode(v, &o), &o).unwrap(), v);
    }

    #[test]
    fn prop_single_matches_ieee_layout(v in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
        let o = CodecOptions::new().with_precision(Precision::Single);
        let raw = float::encode(f64::from(v), &o);
        prop_assert_eq!(raw.clone(), v.to_be_bytes().to_vec());
        prop_assert_eq!(float::decode(&raw, &o).unwrap(), f64::from(v));
    }

    // --- fixed strings are always exactly `bytes` long ---
    #[test]
    fn prop_fixed_string_width(s in prop::collection::vec(any::<u8>(), 0..32), bytes in 0usize..32) {
        let o = CodecOptions::new().with_bytes(bytes);
        let raw = string::encode(&s, &o).unwrap();
        prop_assert_eq!(raw.len(), bytes);
        let keep = s.len().min(bytes);
        prop_assert_eq!(&raw[..keep], &s[..keep]);
        prop_assert!(raw[keep..].iter().all(|&b| b == b' '));
    }
}
