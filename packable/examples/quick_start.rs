//! Packs a small header with a custom type and reads it back.

use packable::prelude::*;

fn main() -> Result<()> {
    let engine = Engine::new();

    // A point is two signed shorts
    engine.declare_type("Point", TypeName::OBJECT)?;
    engine.register_packer(
        Packer::builder("Point")
            .write(|value, _, session| {
                let fields = value.as_composite().map(|c| c.fields.as_slice()).unwrap_or_default();
                for field in fields {
                    session.write_value(field, "short")?;
                }
                Ok(())
            })
            .read(|session, _| {
                let x = session.read_value("short")?;
                let y = session.read_value("short")?;
                Ok(Composite::new("Point", vec![x, y]).into())
            })
            .build(),
    )?;

    let signature = CodecOptions::new().with_bytes(3).with_fill("FLV");
    let values = [
        Value::from("F"),
        Value::from(1),
        Value::from(Composite::new("Point", vec![Value::from(-3), Value::from(7)])),
        Value::from(0.5),
    ];

    let mut stream = Stream::in_memory();
    let written = engine
        .packed(&mut stream)
        .write(values[0].clone(), signature)?
        .write(values[1].clone(), "char")?
        .write(values[2].clone(), Directive::Default)?
        .write(values[3].clone(), "float")?
        .finish();
    println!("wrote {written} bytes");

    stream.rewind()?;
    let decoded = engine
        .chain(&mut stream)
        .read((TypeName::STRING, CodecOptions::new().with_bytes(3)))?
        .read("char")?
        .read(TypeName::new("Point"))?
        .read("float")?
        .finish();
    for value in &decoded {
        println!("{value:?}");
    }
    Ok(())
}
