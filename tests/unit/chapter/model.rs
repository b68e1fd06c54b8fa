use super::*;

#[test]
fn overlays_alias_and_nulls_deserialize() {
    let json = r#"{
      "number": 3,
      "pages": [
        { "pageNumber": 1, "imagePath": "p1.png", "overlays": [
          { "coordinates": [[0,0],[10,0],[10,10]], "events": { "bgm": [{ "src": "a.mp3", "loop": false }], "sfx": null } }
        ] },
        { "pageNumber": 2, "imagePath": "p2.png", "overlays": null },
        { "imagePath": "p3.png" }
      ]
    }"#;
    let ch: Chapter = serde_json::from_str(json).unwrap();
    assert_eq!(ch.number, 3);
    assert_eq!(ch.pages.len(), 3);
    assert_eq!(ch.pages[0].panels.len(), 1);
    assert!(ch.pages[1].panels.is_empty());
    assert!(ch.pages[2].panels.is_empty());

    let ev = &ch.pages[0].panels[0].events;
    assert_eq!(ev.bgm[0].src, "a.mp3");
    assert_eq!(ev.bgm[0].looped, Some(false));
    assert!(ev.sfx.is_empty());
    assert_eq!(ch.panel_count(), 3);
}

#[test]
fn sound_key_uses_layer_prefix() {
    assert_eq!(
        SoundKey::new(LayerKind::Background, "theme.mp3").as_str(),
        "bgm-theme.mp3"
    );
    assert_eq!(SoundKey::new(LayerKind::Effect, "hit.wav").to_string(), "sfx-hit.wav");
    assert_eq!(SoundKey::new(LayerKind::Speech, "line1.ogg").as_str(), "tts-line1.ogg");
}

#[test]
fn event_set_layers_map_to_fields() {
    let mut set = EventSet::default();
    assert!(set.is_empty());
    set.tts.push(SoundEvent::new("hello.ogg"));
    assert_eq!(set.layer(LayerKind::Speech)[0].src, "hello.ogg");
    assert!(!set.is_empty());
}

#[test]
fn sound_event_serializes_sparse_camel_case() {
    let ev = SoundEvent {
        fade_in: Some(50.0),
        looped: Some(true),
        ..SoundEvent::new("x.mp3")
    };
    let v = serde_json::to_value(&ev).unwrap();
    assert_eq!(
        v,
        serde_json::json!({ "src": "x.mp3", "fadeIn": 50.0, "loop": true })
    );
}

#[test]
fn panel_polygon_converts_to_points() {
    let panel = Panel {
        coordinates: Some(vec![[1.0, 2.0], [3.0, 4.0], [5.0, 0.0]]),
        center: Some([2.0, 2.0]),
        events: EventSet::default(),
    };
    let poly = panel.polygon().unwrap();
    assert_eq!(poly[1], Point::new(3.0, 4.0));
    assert_eq!(panel.declared_center(), Some(Point::new(2.0, 2.0)));
    assert!(Panel::default().polygon().is_none());
}

#[test]
fn sound_keys_parse_from_their_display_form() {
    let key: SoundKey = "sfx-door-slam.wav".parse().unwrap();
    assert_eq!(key, SoundKey::new(LayerKind::Effect, "door-slam.wav"));
    assert_eq!(key.to_string(), "sfx-door-slam.wav");

    assert!("bgm-".parse::<SoundKey>().is_err());
    assert!("music-x.mp3".parse::<SoundKey>().is_err());
}
