use super::*;

#[test]
fn events_use_a_snake_case_type_tag() {
    let json = serde_json::to_value(EditorEvent::PointerDown { x: 1.0, y: 2.0 }).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "type": "pointer_down", "x": 1.0, "y": 2.0 })
    );
    let json = serde_json::to_value(EditorEvent::Blur).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "blur" }));
}

#[test]
fn script_parses_every_event_kind() {
    let script = serde_json::json!([
        { "type": "pointer_down", "x": 60, "y": 70 },
        { "type": "pointer_move", "x": 61, "y": 70 },
        { "type": "pointer_up", "x": 61, "y": 70 },
        { "type": "click" },
        { "type": "drag", "x": 100, "y": 200 },
        { "type": "resize", "scale_x": 1.5 },
        { "type": "input", "text": "Hello" },
        { "type": "blur" },
        { "type": "set_font_size", "px": 20 },
        { "type": "font_size_input", "raw": "abc" },
        { "type": "set_font_family", "family": "NanumBrush" },
        { "type": "set_fill_color", "color": "#ff0000" },
        { "type": "set_stroke_color", "color": "00f" },
        { "type": "export" },
        { "type": "reset" }
    ]);
    let events = parse_script(&script.to_string()).unwrap();
    assert_eq!(events.len(), 15);
    assert_eq!(events[0], EditorEvent::PointerDown { x: 60.0, y: 70.0 });
    assert_eq!(events[4], EditorEvent::Drag { x: 100.0, y: 200.0 });
    assert_eq!(events[3], EditorEvent::Click);
    assert_eq!(
        events[10],
        EditorEvent::SetFontFamily {
            family: FontFamily::NanumBrush
        }
    );
    assert_eq!(
        events[12],
        EditorEvent::SetStrokeColor {
            color: HexColor::rgb(0, 0, 255)
        }
    );
}

#[test]
fn malformed_scripts_are_serde_errors() {
    for bad in [
        r#"{"type": "blur"}"#,
        r#"[{"type": "explode"}]"#,
        r#"[{"type": "set_fill_color", "color": "red"}]"#,
        r#"[{"type": "set_font_family", "family": "Arial"}]"#,
    ] {
        let err = parse_script(bad).unwrap_err();
        assert!(matches!(err, OvertextError::Serde(_)), "{bad}");
    }
}
