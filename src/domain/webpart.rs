//! Script Editor web part markup

use regex::{NoExpand, Regex};

const SCRIPT_EDITOR_TEMPLATE: &str = concat!(
    r#"<webParts><webPart xmlns="http://schemas.microsoft.com/WebPart/v3">"#,
    "<metaData>",
    r#"<type name="Microsoft.SharePoint.WebPartPages.ScriptEditorWebPart, Microsoft.SharePoint, Version=15.0.0.0, Culture=neutral, PublicKeyToken=71e9bce111e9429c" />"#,
    "</metaData>",
    "<data><properties>",
    r##"<property name="Title" type="string">#title#</property>"##,
    r#"<property name="ChromeType" type="chrometype">None</property>"#,
    r##"<property name="Content" type="string"><![CDATA[#content#]]></property>"##,
    "</properties></data>",
    "</webPart></webParts>",
);

/// Web part XML for a chrome-less Script Editor holding `content`.
pub fn script_editor_markup(title: &str, content: &str) -> String {
    let title_re = Regex::new("(?i)#title#").expect("static pattern");
    let content_re = Regex::new("(?i)#content#").expect("static pattern");
    let with_title = title_re.replace_all(SCRIPT_EDITOR_TEMPLATE, NoExpand(title));
    content_re
        .replace_all(&with_title, NoExpand(content))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_title_and_content_when_rendering_then_fills_placeholders() {
        let xml = script_editor_markup("Banner", "<script>go()</script>");
        assert!(xml.contains(r#"<property name="Title" type="string">Banner</property>"#));
        assert!(xml.contains("<![CDATA[<script>go()</script>]]>"));
        assert!(!xml.contains("#title#"));
    }
}
