//! Property tests for the packing engine

use packable::{
    CodecOptions, Directive, Endian, Engine, Integer, PackError, Precision, Stream, TypeName, Value,
};
use proptest::prelude::*;

fn endian() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Big), Just(Endian::Little), Just(Endian::Native)]
}

proptest! {
    // -------------------------------------------------------------
    // 1. Integers that fit their width survive pack then unpack.
    // -------------------------------------------------------------
    #[test]
    fn prop_integer_round_trip(raw in any::<i64>(), bytes in 1usize..=16, endian in endian(), signed in any::<bool>()) {
        let engine = Engine::new();
        // squeeze the sample into the chosen width and signedness
        let bits = 8 * bytes as u32;
        let v: i128 = match (signed, bits >= 64) {
            (true, true) => raw.into(),
            (true, false) => ((raw << (64 - bits)) >> (64 - bits)).into(),
            (false, true) => (raw as u64).into(),
            (false, false) => (raw as u64 & ((1u64 << bits) - 1)).into(),
        };

        let options = CodecOptions::new().with_bytes(bytes).with_endian(endian).with_signed(signed);
        let raw = engine.pack_value(&Value::from(v), options.clone()).unwrap();
        prop_assert_eq!(raw.len(), bytes);
        let back = engine.unpack_value(&raw, (TypeName::INTEGER, options)).unwrap();
        prop_assert_eq!(back, Some(Value::from(v)));
    }

    // -------------------------------------------------------------
    // 2. Overflowing values keep their low-order bytes.
    // -------------------------------------------------------------
    #[test]
    fn prop_truncation(v in any::<u64>(), bytes in 1usize..8) {
        let engine = Engine::new();
        let options = CodecOptions::new().with_bytes(bytes).with_signed(false);
        let raw = engine.pack_value(&Value::from(v), options).unwrap();
        let expected = &v.to_be_bytes()[8 - bytes..];
        prop_assert_eq!(&raw[..], expected);
    }

    // -------------------------------------------------------------
    // 3. Values wider than a machine word round trip with room to spare.
    // -------------------------------------------------------------
    #[test]
    fn prop_wide_round_trip(hi in any::<u64>(), lo in any::<u64>(), shift in 0u32..64, extra in 0usize..4) {
        let engine = Engine::new();
        let wide = Integer::from(hi) * Integer::from(1u128 << (64 + shift)) + Integer::from(lo);
        let value = Value::from(wide);
        let bytes = 17 + shift as usize / 8 + extra;
        let options = CodecOptions::new().with_bytes(bytes).with_signed(false);
        let raw = engine.pack_value(&value, options.clone()).unwrap();
        let back = engine.unpack_value(&raw, (TypeName::INTEGER, options)).unwrap();
        prop_assert_eq!(back, Some(value));
    }

    // -------------------------------------------------------------
    // 4. Finite doubles round trip; singles use the IEEE layout.
    // -------------------------------------------------------------
    #[test]
    fn prop_float_round_trip(v in any::<f64>().prop_filter("finite", |v| v.is_finite()), endian in endian()) {
        let engine = Engine::new();
        let options = CodecOptions::new().with_precision(Precision::Double).with_endian(endian);
        let raw = engine.pack_value(&Value::from(v), options.clone()).unwrap();
        let back = engine.unpack_value(&raw, (TypeName::FLOAT, options)).unwrap();
        prop_assert_eq!(back, Some(Value::from(v)));
    }

    #[test]
    fn prop_single_layout(v in any::<f32>().prop_filter("not nan", |v| !v.is_nan())) {
        let engine = Engine::new();
        let raw = engine.pack_value(&Value::from(v), "float").unwrap();
        prop_assert_eq!(raw, v.to_be_bytes().to_vec());
    }

    // -------------------------------------------------------------
    // 5. Fixed width strings are padded or cut to exactly that width.
    // -------------------------------------------------------------
    #[test]
    fn prop_fixed_string(s in prop::collection::vec(any::<u8>(), 0..32), bytes in 0usize..32) {
        let engine = Engine::new();
        let raw = engine
            .pack_value(&Value::from(s.clone()), CodecOptions::new().with_bytes(bytes))
            .unwrap();
        prop_assert_eq!(raw.len(), bytes);
        let kept = s.len().min(bytes);
        prop_assert_eq!(&raw[..kept], &s[..kept]);
        prop_assert!(raw[kept..].iter().all(|&b| b == b' '));
    }

    // -------------------------------------------------------------
    // 6. Too-short buffers are absent in memory and errors on streams.
    // -------------------------------------------------------------
    #[test]
    fn prop_short_buffer(data in prop::collection::vec(any::<u8>(), 0..8)) {
        let engine = Engine::new();
        prop_assert_eq!(engine.unpack_value(&data, "double").unwrap(), None);

        let mut stream = Stream::from_bytes(data.clone());
        let is_eof = matches!(
            engine.read_value(&mut stream, "double"),
            Err(PackError::UnexpectedEof { .. })
        );
        prop_assert!(is_eof);
    }

    // -------------------------------------------------------------
    // 7. Multi-value packing reports the sum of the encoded widths.
    // -------------------------------------------------------------
    #[test]
    fn prop_multi_value_delta(ints in prop::collection::vec(any::<i16>(), 1..16)) {
        let engine = Engine::new();
        let values: Vec<Value> = ints.iter().copied().map(Value::from).collect();
        let directives: Vec<Directive> = ints.iter().map(|_| Directive::from("short")).collect();

        let mut stream = Stream::in_memory();
        let delta = engine.pack_and_write(&mut stream, &values, directives).unwrap();
        prop_assert_eq!(delta, 2 * ints.len() as u64);

        stream.rewind().unwrap();
        let decoded: Vec<Value> = engine
            .each_packed(&mut stream, "short")
            .unwrap()
            .map(|v| v.unwrap())
            .collect();
        prop_assert_eq!(decoded, values);
    }
}
