//! ORCID search response parsing.
//!
//! The XML body is decoded into a small namespace-aware element tree, which
//! is then searched by (namespace, local name).

use crate::error::{OrcidError, Result};
use crate::types::SearchResult;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// Namespace of the ORCID message schema.
pub const ORCID_NS: &str = "http://www.orcid.org/ns/orcid";

/// An XML element with its namespace resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct XmlElement {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlAttribute {
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

impl XmlElement {
    fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// First element in document order (self included) with this name.
    pub fn find(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        if self.is(namespace, name) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(namespace, name))
    }

    /// First direct child with this name.
    pub fn child(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    /// Value of an attribute that has no namespace.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }
}

fn namespace_uri(ns: &ResolveResult) -> Option<String> {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        _ => None,
    }
}

fn xml_error(e: impl std::fmt::Display) -> OrcidError {
    OrcidError::Parse(format!("XML parse error: {}", e))
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart,
) -> Result<XmlElement> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        // xmlns declarations are already applied by the reader
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (ns, local) = reader.resolve_attribute(attr.key);
        attributes.push(XmlAttribute {
            namespace: namespace_uri(&ns),
            name: String::from_utf8_lossy(local.as_ref()).into_owned(),
            value: attr.unescape_value().map_err(xml_error)?.into_owned(),
        });
    }

    Ok(XmlElement {
        namespace,
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(OrcidError::Parse("multiple root elements".to_string())),
    }
    Ok(())
}

/// Decode an XML document into its root element.
pub(crate) fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (ns, event) = reader.read_resolved_event().map_err(xml_error)?;
        let namespace = namespace_uri(&ns);

        match event {
            Event::Start(e) => {
                let element = open_element(&reader, namespace, &e)?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = open_element(&reader, namespace, &e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| OrcidError::Parse("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(OrcidError::Parse("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| OrcidError::Parse("no root element".to_string()))
}

/// Parse an ORCID search XML response into a [`SearchResult`].
///
/// `num_found` comes from the `num-found` attribute of
/// `orcid-search-results` (0 when absent); `orcid` is the trimmed `path` of
/// the first profile's `orcid-identifier`, if non-empty.
pub fn parse_search_response(xml: &str) -> Result<SearchResult> {
    let root = parse_document(xml)?;

    let num_found = match root
        .find(ORCID_NS, "orcid-search-results")
        .and_then(|r| r.attribute("num-found"))
    {
        Some(value) => value.trim().parse::<u64>().map_err(|_| {
            OrcidError::Parse(format!("Invalid num-found attribute: {:?}", value))
        })?,
        None => 0,
    };

    let orcid = root
        .find(ORCID_NS, "orcid-profile")
        .and_then(|p| p.child(ORCID_NS, "orcid-identifier"))
        .and_then(|i| i.child(ORCID_NS, "path"))
        .map(|path| path.text.trim().to_string())
        .filter(|path| !path.is_empty());

    Ok(SearchResult { num_found, orcid })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_RESULT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<orcid-message xmlns="http://www.orcid.org/ns/orcid">
    <message-version>1.2</message-version>
    <orcid-search-results num-found="1">
        <orcid-search-result>
            <relevancy-score>17.32</relevancy-score>
            <orcid-profile>
                <orcid-identifier>
                    <uri>http://orcid.org/0000-0002-1900-4162</uri>
                    <path>
                        0000-0002-1900-4162
                    </path>
                    <host>orcid.org</host>
                </orcid-identifier>
            </orcid-profile>
        </orcid-search-result>
    </orcid-search-results>
</orcid-message>"#;

    const NO_RESULTS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<orcid-message xmlns="http://www.orcid.org/ns/orcid">
    <message-version>1.2</message-version>
    <orcid-search-results num-found="0"/>
</orcid-message>"#;

    #[test]
    fn test_parse_one_result() {
        let result = parse_search_response(ONE_RESULT).unwrap();
        assert_eq!(result.num_found, 1);
        assert_eq!(result.orcid.as_deref(), Some("0000-0002-1900-4162"));
    }

    #[test]
    fn test_parse_no_results() {
        let result = parse_search_response(NO_RESULTS).unwrap();
        assert_eq!(result, SearchResult::default());
    }

    #[test]
    fn test_prefixed_namespace() {
        let xml = r#"<o:orcid-message xmlns:o="http://www.orcid.org/ns/orcid">
            <o:orcid-search-results num-found="1">
                <o:orcid-search-result><o:orcid-profile><o:orcid-identifier>
                    <o:path>0000-0003-3096-6829</o:path>
                </o:orcid-identifier></o:orcid-profile></o:orcid-search-result>
            </o:orcid-search-results>
        </o:orcid-message>"#;
        let result = parse_search_response(xml).unwrap();
        assert_eq!(result.num_found, 1);
        assert_eq!(result.orcid.as_deref(), Some("0000-0003-3096-6829"));
    }

    #[test]
    fn test_wrong_namespace_ignored() {
        let xml = r#"<orcid-message xmlns="http://example.com/other">
            <orcid-search-results num-found="1">
                <orcid-profile><orcid-identifier><path>0000-0002-1900-4162</path></orcid-identifier></orcid-profile>
            </orcid-search-results>
        </orcid-message>"#;
        let result = parse_search_response(xml).unwrap();
        assert_eq!(result.num_found, 0);
        assert_eq!(result.orcid, None);
    }

    #[test]
    fn test_first_profile_wins() {
        let xml = r#"<orcid-message xmlns="http://www.orcid.org/ns/orcid">
            <orcid-search-results num-found="2">
                <orcid-search-result><orcid-profile><orcid-identifier>
                    <path>0000-0002-1900-4162</path>
                </orcid-identifier></orcid-profile></orcid-search-result>
                <orcid-search-result><orcid-profile><orcid-identifier>
                    <path>0000-0003-3096-6829</path>
                </orcid-identifier></orcid-profile></orcid-search-result>
            </orcid-search-results>
        </orcid-message>"#;
        let result = parse_search_response(xml).unwrap();
        assert_eq!(result.num_found, 2);
        assert_eq!(result.orcid.as_deref(), Some("0000-0002-1900-4162"));
    }

    #[test]
    fn test_blank_path_is_none() {
        let xml = r#"<orcid-message xmlns="http://www.orcid.org/ns/orcid">
            <orcid-search-results num-found="1">
                <orcid-search-result><orcid-profile><orcid-identifier>
                    <path>   </path>
                </orcid-identifier></orcid-profile></orcid-search-result>
            </orcid-search-results>
        </orcid-message>"#;
        let result = parse_search_response(xml).unwrap();
        assert_eq!(result.num_found, 1);
        assert_eq!(result.orcid, None);
    }

    #[test]
    fn test_missing_num_found_is_zero() {
        let xml = r#"<orcid-message xmlns="http://www.orcid.org/ns/orcid"/>"#;
        assert_eq!(parse_search_response(xml).unwrap().num_found, 0);
    }

    #[test]
    fn test_invalid_num_found() {
        let xml = r#"<orcid-message xmlns="http://www.orcid.org/ns/orcid">
            <orcid-search-results num-found="many"/>
        </orcid-message>"#;
        assert!(matches!(
            parse_search_response(xml),
            Err(OrcidError::Parse(_))
        ));
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            parse_search_response("<orcid-message><oops></orcid-message>"),
            Err(OrcidError::Parse(_))
        ));
        assert!(matches!(
            parse_search_response("Service Unavailable"),
            Err(OrcidError::Parse(_))
        ));
        assert!(matches!(parse_search_response(""), Err(OrcidError::Parse(_))));
    }

    #[test]
    fn test_document_tree() {
        let root = parse_document(r#"<a xmlns="urn:x" k="v"><b>one</b><b>two</b><c/></a>"#).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.namespace.as_deref(), Some("urn:x"));
        assert_eq!(root.attribute("k"), Some("v"));
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.child("urn:x", "b").map(|b| b.text.as_str()), Some("one"));
        assert!(root.find("urn:x", "c").is_some());
        assert!(root.find("urn:y", "c").is_none());
    }
}
