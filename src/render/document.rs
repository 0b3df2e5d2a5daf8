//! HTML document serialization.
//!
//! ```text
//! <!DOCTYPE html>
//! <html {html_attributes}>
//!   <head>{head_components}</head>
//!   <body {body_attributes}>{content}</body>
//! </html>
//! ```
//!
//! Attributes are written in key order, so equal descriptors always serialize
//! to equal bytes.

use super::compose::RenderDescriptor;
use super::node::{Attributes, Element, Node};
use anyhow::Result;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{Cursor, Write};

type HtmlWriter = Writer<Cursor<Vec<u8>>>;

const DOCTYPE: &[u8] = b"<!DOCTYPE html>";

/// Elements whose children are written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize a composed page into a full HTML document.
pub fn serialize(descriptor: &RenderDescriptor) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.get_mut().write_all(DOCTYPE)?;

    writer.write_event(Event::Start(start("html", &descriptor.html_attributes)))?;

    writer.write_event(Event::Start(BytesStart::new("head")))?;
    for node in &descriptor.head_components {
        write_node(&mut writer, node)?;
    }
    writer.write_event(Event::End(BytesEnd::new("head")))?;

    writer.write_event(Event::Start(start("body", &descriptor.body_attributes)))?;
    write_node(&mut writer, &descriptor.content)?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;

    writer.write_event(Event::End(BytesEnd::new("html")))?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn start<'a>(tag: &'a str, attrs: &'a Attributes) -> BytesStart<'a> {
    let mut elem = BytesStart::new(tag);
    for (key, value) in attrs {
        elem.push_attribute((key.as_str(), value.as_str()));
    }
    elem
}

fn write_node(writer: &mut HtmlWriter, node: &Node) -> Result<()> {
    match node {
        Node::Element(elem) => write_element(writer, elem)?,
        Node::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        Node::Raw(html) => writer.get_mut().write_all(html.as_bytes())?,
        Node::Fragment(children) => {
            for child in children {
                write_node(writer, child)?;
            }
        }
    }
    Ok(())
}

fn write_element(writer: &mut HtmlWriter, elem: &Element) -> Result<()> {
    let open = start(&elem.tag, &elem.attrs);
    if elem.is_void() {
        writer.write_event(Event::Empty(open))?;
        return Ok(());
    }

    writer.write_event(Event::Start(open))?;
    if RAW_TEXT_ELEMENTS.contains(&elem.tag.to_ascii_lowercase().as_str()) {
        for child in &elem.children {
            write_verbatim(writer, child)?;
        }
    } else {
        for child in &elem.children {
            write_node(writer, child)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(elem.tag.as_str())))?;
    Ok(())
}

/// Text and raw content of a `script`/`style` child, unescaped.
fn write_verbatim(writer: &mut HtmlWriter, node: &Node) -> Result<()> {
    match node {
        Node::Text(text) | Node::Raw(text) => writer.get_mut().write_all(text.as_bytes())?,
        Node::Element(elem) => {
            for child in &elem.children {
                write_verbatim(writer, child)?;
            }
        }
        Node::Fragment(children) => {
            for child in children {
                write_verbatim(writer, child)?;
            }
        }
    }
    Ok(())
}
