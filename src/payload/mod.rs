//! Test payload serialization
//!
//! Builds the XML document the engine's run-tests entry point consumes.
//! The document is a flat list of elements in a fixed order wrapped in a
//! `<root>` element. Values are written as-is, nothing is validated.

mod options;

pub use options::OptionFlags;

use crate::models::TestConfig;

/// Display mode index sent when no matching mode exists
pub const DISPLAY_MODE_NOT_FOUND: i32 = -1;

/// Element names in the order the engine expects them
pub const ELEMENT_ORDER: [&str; 14] = [
    "option",
    "duration",
    "multisample",
    "anisotropy",
    "texturelod",
    "displaymode",
    "renderer",
    "pixelformat",
    "test",
    "fbenable",
    "fbformat",
    "scene",
    "width",
    "height",
];

/// Render one `<name>value</name>` line
pub fn xml_element(name: &str, value: impl std::fmt::Display) -> String {
    format!("<{name}>{value}</{name}>\n")
}

/// Serialize `config` into the engine's XML payload.
///
/// `display_mode` is the index of the matching display mode, or
/// [`DISPLAY_MODE_NOT_FOUND`]. It is a parameter so the payload depends
/// only on its inputs.
pub fn build_xml(config: &TestConfig, display_mode: i32) -> String {
    let options = OptionFlags::from_config(config);

    let elements = [
        xml_element("option", options),
        xml_element("duration", config.duration_secs),
        xml_element("multisample", config.multisample_count),
        xml_element("anisotropy", config.max_anisotropy),
        xml_element("texturelod", config.texture_lod),
        xml_element("displaymode", display_mode),
        xml_element("renderer", config.renderer.code()),
        xml_element("pixelformat", config.pixel_format),
        xml_element("test", config.renderer.test_version()),
        xml_element("fbenable", config.fb_type.xml_value()),
        xml_element("fbformat", config.fb_format.xml_value()),
        xml_element("scene", config.scene.code()),
        xml_element("width", config.width),
        xml_element("height", config.height),
    ];

    let mut body = String::with_capacity(512);
    for element in &elements {
        body.push_str(element);
    }

    xml_element("root", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FramebufferFormat, FramebufferType, RendererType, SceneType};

    fn element_names(xml: &str) -> Vec<String> {
        xml.lines()
            .filter_map(|line| {
                let line = line.strip_prefix("<root>").unwrap_or(line);
                let start = line.find('<')? + 1;
                let end = line[start..].find('>')? + start;
                let name = &line[start..end];
                (!name.starts_with('/')).then(|| name.to_string())
            })
            .collect()
    }

    #[test]
    fn test_xml_element() {
        assert_eq!(xml_element("width", 1920), "<width>1920</width>\n");
        assert_eq!(xml_element("test", "4.6"), "<test>4.6</test>\n");
    }

    #[test]
    fn test_default_payload_contents() {
        let config = TestConfig::default_preset();
        let xml = build_xml(&config, 48);

        assert!(xml.starts_with("<root><option>0</option>\n"));
        assert!(xml.ends_with("<height>1080</height>\n</root>\n"));
        for expected in [
            "<renderer>12</renderer>",
            "<scene>0</scene>",
            "<width>1920</width>",
            "<height>1080</height>",
            "<duration>5</duration>",
            "<test>4.6</test>",
            "<displaymode>48</displaymode>",
            "<pixelformat>1</pixelformat>",
            "<fbenable>Default</fbenable>",
            "<fbformat>Linear</fbformat>",
        ] {
            assert!(xml.contains(expected), "missing {expected} in {xml}");
        }
    }

    #[test]
    fn test_exact_payload() {
        let config = TestConfig::default_preset();
        let expected = "<root><option>0</option>\n\
                        <duration>5</duration>\n\
                        <multisample>0</multisample>\n\
                        <anisotropy>0</anisotropy>\n\
                        <texturelod>0</texturelod>\n\
                        <displaymode>-1</displaymode>\n\
                        <renderer>12</renderer>\n\
                        <pixelformat>1</pixelformat>\n\
                        <test>4.6</test>\n\
                        <fbenable>Default</fbenable>\n\
                        <fbformat>Linear</fbformat>\n\
                        <scene>0</scene>\n\
                        <width>1920</width>\n\
                        <height>1080</height>\n\
                        </root>\n";
        assert_eq!(build_xml(&config, DISPLAY_MODE_NOT_FOUND), expected);
    }

    #[test]
    fn test_element_order() {
        let xml = build_xml(&TestConfig::quality(), 3);
        assert_eq!(element_names(&xml), ELEMENT_ORDER.to_vec());
    }

    #[test]
    fn test_deterministic() {
        let config = TestConfig::quality().with_renderer(RendererType::Vulkan1_1);
        assert_eq!(build_xml(&config, 7), build_xml(&config.clone(), 7));
    }

    #[test]
    fn test_vulkan_and_framebuffer_values() {
        let config = TestConfig {
            renderer: RendererType::Vulkan1_2,
            scene: SceneType::ManyCharacters,
            fb_format: FramebufferFormat::Srgb,
            fb_type: FramebufferType::FramebufferObject,
            fullscreen: true,
            ..TestConfig::default()
        };
        let xml = build_xml(&config, 0);

        assert!(xml.contains("<renderer>15</renderer>"));
        assert!(xml.contains("<test>1.0</test>"));
        assert!(xml.contains("<scene>3</scene>"));
        assert!(xml.contains("<fbformat>sRGB</fbformat>"));
        assert!(xml.contains("<fbenable>FrameBufferObject</fbenable>"));
        assert!(xml.contains(&format!("<option>{}</option>", (1 << 11) | (1 << 9))));
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let config = TestConfig {
            width: -5,
            multisample_count: 33,
            max_anisotropy: 999,
            texture_lod: -2,
            duration_secs: 0,
            ..TestConfig::default()
        };
        let xml = build_xml(&config, DISPLAY_MODE_NOT_FOUND);

        assert!(xml.contains("<width>-5</width>"));
        assert!(xml.contains("<multisample>33</multisample>"));
        assert!(xml.contains("<anisotropy>999</anisotropy>"));
        assert!(xml.contains("<texturelod>-2</texturelod>"));
        assert!(xml.contains("<duration>0</duration>"));
    }
}
