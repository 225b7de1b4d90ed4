use serde_json::{json, Value};

/// A complete, schema-valid family record.
pub fn family(id: &str, date: &str, surname: &str) -> Value {
    let names = |native: Value| json!({"native": native, "english": null, "russian": null});
    let place = || {
        json!({
            "main": {"native": null, "russian": null, "english": null},
            "pre": {"native": null, "russian": null, "english": null}
        })
    };

    json!({
        "id": id,
        "date": date,
        "gender": "male",
        "familyName": {"main": names(json!(surname)), "pre": names(Value::Null)},
        "ethnicity": {
            "main": {
                "native": "Татар", "english": "Tatar", "russian": "Татарин",
                "sub": {"native": null, "english": null, "russian": null}
            },
            "pre": {
                "native": null, "english": null, "russian": null,
                "sub": {"native": null, "english": null, "russian": null}
            }
        },
        "location": {
            "coordinates": {
                "main": {"latitude": 55.79, "longitude": 49.12},
                "pre": {"latitude": null, "longitude": null}
            },
            "village": place(),
            "region": place(),
            "state": place()
        },
        "yDnaHaplogroup": {
            "root": "R1a", "clade": "R1a1", "subclade": null, "terminalSnp": "Z93", "SnpList": null
        },
        "mtDnaHaplogroup": {"root": "H", "clade": null, "terminalSnp": null}
    })
}
