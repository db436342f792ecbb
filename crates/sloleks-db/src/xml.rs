//! Minimal element tree over `quick-xml` events, built one `<entry>` at a time.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// An element with its attributes, concatenated text and child elements.
#[derive(Clone, Debug, Default)]
pub(crate) struct XmlNode {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn open(start: &BytesStart<'_>) -> Result<Self, quick_xml::Error> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name,
            attrs,
            ..Self::default()
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Own text content with surrounding whitespace removed.
    pub(crate) fn text(&self) -> &str {
        self.text.trim()
    }

    /// Direct children named `name`.
    pub(crate) fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub(crate) fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Descendants named `name`, depth first, in document order. Does not
    /// include `self`.
    pub(crate) fn descendants<'a>(&'a self, name: &'a str) -> Vec<&'a XmlNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.name == name {
                out.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub(crate) fn find(&self, name: &str) -> Option<&XmlNode> {
        let mut stack: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.name == name {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Follow a path of direct child names.
    pub(crate) fn path(&self, names: &[&str]) -> Option<&XmlNode> {
        names
            .iter()
            .try_fold(self, |node, name| node.child(name))
    }
}

/// Pulls successive subtrees rooted at elements named `root` out of a document.
pub(crate) struct SubtreeReader<'a> {
    reader: Reader<&'a [u8]>,
    root: &'static str,
}

impl<'a> SubtreeReader<'a> {
    pub(crate) fn new(xml: &'a str, root: &'static str) -> Self {
        Self {
            reader: Reader::from_str(xml),
            root,
        }
    }

    /// Next `root` subtree, or `None` at end of document.
    pub(crate) fn next_subtree(&mut self) -> Result<Option<XmlNode>, quick_xml::Error> {
        loop {
            match self.reader.read_event()? {
                Event::Start(start) if start.local_name().as_ref() == self.root.as_bytes() => {
                    let node = XmlNode::open(&start)?;
                    return self.read_children(node).map(Some);
                }
                Event::Empty(start) if start.local_name().as_ref() == self.root.as_bytes() => {
                    return XmlNode::open(&start).map(Some);
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    fn read_children(&mut self, root: XmlNode) -> Result<XmlNode, quick_xml::Error> {
        let mut stack = vec![root];
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => stack.push(XmlNode::open(&start)?),
                Event::Empty(start) => {
                    let node = XmlNode::open(&start)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
                Event::Text(text) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(node) = stack.last_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::End(_) => {
                    let Some(done) = stack.pop() else {
                        continue;
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => return Ok(done),
                    }
                }
                Event::Eof => {
                    return Err(quick_xml::Error::Syntax(
                        quick_xml::errors::SyntaxError::UnclosedTag,
                    ));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_subtrees_in_document_order() {
        let xml = r#"<lexicon>
            <entry id="1"><head><lemma>a</lemma></head></entry>
            <other/>
            <entry id="2"><head><lemma>b &amp; c</lemma></head><x k="v"/></entry>
        </lexicon>"#;
        let mut reader = SubtreeReader::new(xml, "entry");
        let first = reader.next_subtree().unwrap().unwrap();
        assert_eq!(first.attr("id"), Some("1"));
        assert_eq!(first.path(&["head", "lemma"]).unwrap().text(), "a");
        let second = reader.next_subtree().unwrap().unwrap();
        assert_eq!(second.find("lemma").unwrap().text(), "b & c");
        assert_eq!(second.child("x").unwrap().attr("k"), Some("v"));
        assert!(reader.next_subtree().unwrap().is_none());
    }

    #[test]
    fn descendants_are_depth_first() {
        let xml = "<entry><a><f>1</f><b><f>2</f></b></a><f>3</f></entry>";
        let node = SubtreeReader::new(xml, "entry")
            .next_subtree()
            .unwrap()
            .unwrap();
        let texts: Vec<_> = node.descendants("f").iter().map(|n| n.text()).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
        assert_eq!(node.name(), "entry");
    }

    #[test]
    fn child_lookup_outlives_the_name() {
        let xml = "<entry><head><grammar><category>noun</category></grammar></head></entry>";
        let node = SubtreeReader::new(xml, "entry")
            .next_subtree()
            .unwrap()
            .unwrap();
        let found = {
            let names = vec!["head".to_string(), "grammar".to_string()];
            let path: Vec<&str> = names.iter().map(String::as_str).collect();
            node.path(&path)
        };
        let category = found.and_then(|g| {
            let name = String::from("category");
            g.child(&name)
        });
        assert_eq!(category.map(XmlNode::text), Some("noun"));
        assert_eq!(node.children("head").count(), 1);
    }

    #[test]
    fn mismatched_tags_are_errors() {
        let mut reader = SubtreeReader::new("<entry><a></b></entry>", "entry");
        assert!(reader.next_subtree().is_err());
    }
}
