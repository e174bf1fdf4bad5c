//! Packers every engine starts with.
//!
//! The three primitive types get a default packer wired to their codec.
//! Shortcuts are named packers that only carry options and run the default
//! strategies of their type.

use pack_codec::{CodecOptions, Precision, float, integer, string};

use crate::{PackError, Packer, Registry, Result, Session, TypeName, Value};

pub(crate) fn install(registry: &Registry) {
    registry.seed(TypeName::INTEGER, TypeName::OBJECT, integer_packers());
    registry.seed(TypeName::FLOAT, TypeName::OBJECT, float_packers());
    registry.seed(TypeName::STRING, TypeName::OBJECT, vec![string_packer()]);
}

fn mismatch(expected: TypeName, value: &Value) -> PackError {
    PackError::TypeMismatch {
        expected,
        found: value.type_name(),
    }
}

fn shortcut(owner: TypeName, name: &str, defaults: CodecOptions) -> Packer {
    Packer::builder(owner).named(name).defaults(defaults).build()
}

fn integer_packers() -> Vec<Packer> {
    let default = Packer::builder(TypeName::INTEGER)
        .write(|value: &Value, options: &CodecOptions, session: &mut Session<'_>| {
            let n = value
                .as_integer()
                .ok_or_else(|| mismatch(TypeName::INTEGER, value))?;
            session.write_bytes(&integer::encode(n, options)?)
        })
        .read(|session: &mut Session<'_>, options: &CodecOptions| {
            let width = integer::read_width(options)?;
            let raw = session.read_exact(width)?;
            Ok(Value::Int(integer::decode(&raw, options)?))
        })
        .build();

    let int = |bytes, signed| CodecOptions::new().with_bytes(bytes).with_signed(signed);
    vec![
        default,
        shortcut(TypeName::INTEGER, "long", int(4, true)),
        shortcut(TypeName::INTEGER, "short", int(2, true)),
        shortcut(TypeName::INTEGER, "byte", int(1, true)),
        shortcut(TypeName::INTEGER, "char", int(1, false)),
        shortcut(TypeName::INTEGER, "unsigned_long", int(4, false)),
        shortcut(TypeName::INTEGER, "unsigned_short", int(2, false)),
    ]
}

fn float_packers() -> Vec<Packer> {
    let default = Packer::builder(TypeName::FLOAT)
        .write(|value: &Value, options: &CodecOptions, session: &mut Session<'_>| {
            let v = value
                .as_f64()
                .ok_or_else(|| mismatch(TypeName::FLOAT, value))?;
            session.write_bytes(&float::encode(v, options))
        })
        .read(|session: &mut Session<'_>, options: &CodecOptions| {
            let raw = session.read_exact(float::width(options))?;
            Ok(Value::Float(float::decode(&raw, options)?))
        })
        .build();

    let precision = |p| CodecOptions::new().with_precision(p);
    vec![
        default,
        shortcut(TypeName::FLOAT, "double", precision(Precision::Double)),
        shortcut(TypeName::FLOAT, "float", precision(Precision::Single)),
    ]
}

fn string_packer() -> Packer {
    Packer::builder(TypeName::STRING)
        .write(|value: &Value, options: &CodecOptions, session: &mut Session<'_>| {
            let bytes = value
                .as_bytes()
                .ok_or_else(|| mismatch(TypeName::STRING, value))?;
            session.write_bytes(&string::encode(bytes, options)?)
        })
        .read(|session: &mut Session<'_>, options: &CodecOptions| {
            let raw = match string::width(options) {
                Some(n) => session.read_exact(n)?,
                None => session.read_to_end()?,
            };
            Ok(Value::Bytes(raw))
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;

    #[test]
    fn test_primitives_hang_off_object() {
        let engine = Engine::new();
        for t in [TypeName::INTEGER, TypeName::FLOAT, TypeName::STRING] {
            assert_eq!(
                engine.registry().lineage(&t).unwrap(),
                vec![t.clone(), TypeName::OBJECT]
            );
        }
    }

    #[test]
    fn test_shortcut_tables() {
        let engine = Engine::new();
        let r = engine.registry();
        assert_eq!(
            r.packer_names(&TypeName::INTEGER).unwrap(),
            ["byte", "char", "long", "short", "unsigned_long", "unsigned_short"]
        );
        assert_eq!(r.packer_names(&TypeName::FLOAT).unwrap(), ["double", "float"]);
        assert!(r.packer_names(&TypeName::STRING).unwrap().is_empty());

        let char_ = r.resolve(&TypeName::INTEGER, Some("char")).unwrap();
        assert_eq!(char_.defaults(), &CodecOptions::new().with_bytes(1).with_signed(false));
    }

    #[test]
    fn test_wrong_value_kind() {
        let engine = Engine::new();
        // a float forced through the integer default packer
        let packer = engine.registry().resolve(&TypeName::INTEGER, None).unwrap();
        let write = engine
            .registry()
            .write_strategy(&TypeName::INTEGER, &packer)
            .unwrap();
        let mut stream = pack_stream::Stream::in_memory();
        let mut session = Session::new(&engine, &mut stream);
        assert!(matches!(
            write(&Value::from(1.5), &CodecOptions::new(), &mut session),
            Err(PackError::TypeMismatch { .. })
        ));
    }
}
