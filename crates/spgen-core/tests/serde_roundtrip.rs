use spgen_core::provenance::{RunProvenance, SchemaVersion};
use spgen_core::{ChannelSet, ErrorInfo, EventRow, EventTable, SpError};

#[test]
fn event_table_round_trip_json() {
    let channels = ChannelSet::new(["B1", "B2"]).expect("channels");
    let table = EventTable {
        channels,
        rows: vec![
            EventRow::new(20e-12, vec![0, 0]),
            EventRow::new(64e-12, vec![1, -1]),
        ],
    };

    let json = serde_json::to_string_pretty(&table).expect("serialize");
    let decoded: EventTable = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, table);
    assert_eq!(decoded.channels.labels(), ["B1", "B2"]);
    assert_eq!(decoded.rows[1].jumps, vec![1, -1]);
}

#[test]
fn provenance_round_trip_json() {
    let provenance = RunProvenance {
        input_hash: "abc123".into(),
        input_path: "run.csv".into(),
        tool_versions: [("spgen-core".into(), "0.1.0".into())].into_iter().collect(),
    };
    let json = serde_json::to_string(&provenance).expect("serialize");
    let decoded: RunProvenance = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, provenance);
    assert_eq!(SchemaVersion::default(), SchemaVersion::new(1, 0, 0));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = SpError::Calibration(ErrorInfo::new("spgen.calibration.not_found", "missing"));
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(value["family"], "Calibration");
    assert_eq!(value["detail"]["code"], "spgen.calibration.not_found");
}

#[test]
fn channel_set_rejects_duplicates() {
    let err = ChannelSet::new(["B1", "B1"]).unwrap_err();
    assert_eq!(err.info().code, "spgen.channels.duplicate");
    let set = ChannelSet::new(["B1", "B2", "B3"]).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.labels()[2], "B3");
}
