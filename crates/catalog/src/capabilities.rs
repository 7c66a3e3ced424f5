//! Capability-document parsing.
//!
//! Extracts name/title/keyword triples from WMS and WFS
//! `GetCapabilities` responses. Only the elements the viewer needs are
//! read; everything else in the document is skipped.

use std::collections::BTreeSet;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::CatalogError;

/// One layer as advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerEntry {
    pub name: String,
    pub title: String,
    pub keywords: BTreeSet<String>,
}

impl LayerEntry {
    fn empty() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            keywords: BTreeSet::new(),
        }
    }
}

/// Parses a WFS capabilities document: one entry per `FeatureType`,
/// reading `Name`, `Title` and `ows:Keyword` children.
pub fn parse_wfs_capabilities(document: &str) -> Result<Vec<LayerEntry>, CatalogError> {
    parse_entries(document, "FeatureType", "Keywords")
}

/// Parses a WMS capabilities document: one entry per named `Layer`
/// under `Capability`, reading `Name`, `Title` and
/// `KeywordList > Keyword` children. Nameless group layers are
/// containers and produce no entry.
pub fn parse_wms_capabilities(document: &str) -> Result<Vec<LayerEntry>, CatalogError> {
    parse_entries(document, "Layer", "KeywordList")
}

/// Shared event-driven walk. `entry_element` delimits one layer entry;
/// `keyword_list_element` is the wrapper around `Keyword` children.
/// Element names are matched by local name so namespace prefixes
/// (`ows:Keyword`) do not matter.
fn parse_entries(
    document: &str,
    entry_element: &str,
    keyword_list_element: &str,
) -> Result<Vec<LayerEntry>, CatalogError> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut entries: Vec<LayerEntry> = Vec::new();
    // Entry elements may nest (WMS group layers); innermost wins text.
    let mut open_entries: Vec<LayerEntry> = Vec::new();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let local = local_name(start.name().as_ref());
                if local == entry_element {
                    open_entries.push(LayerEntry::empty());
                }
                path.push(local);
            }
            Ok(Event::Empty(_)) => {}
            Ok(Event::Text(text)) => {
                let Some(entry) = open_entries.last_mut() else {
                    continue;
                };
                let value = text
                    .unescape()
                    .map_err(|e| CatalogError::Malformed(e.to_string()))?
                    .trim()
                    .to_string();
                if value.is_empty() {
                    continue;
                }

                match path.as_slice() {
                    [.., parent, leaf] if parent == entry_element && leaf == "Name" => {
                        if entry.name.is_empty() {
                            entry.name = value;
                        }
                    }
                    [.., parent, leaf] if parent == entry_element && leaf == "Title" => {
                        if entry.title.is_empty() {
                            entry.title = value;
                        }
                    }
                    [.., grandparent, parent, leaf]
                        if grandparent == entry_element
                            && parent == keyword_list_element
                            && leaf == "Keyword" =>
                    {
                        entry.keywords.insert(value);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(end)) => {
                let local = local_name(end.name().as_ref());
                path.pop();
                if local == entry_element
                    && let Some(entry) = open_entries.pop()
                    && !entry.name.is_empty()
                {
                    entries.push(entry);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(CatalogError::Malformed(e.to_string())),
        }
    }

    Ok(entries)
}

fn local_name(qname: &[u8]) -> String {
    let bytes = match qname.iter().rposition(|&b| b == b':') {
        Some(idx) => &qname[idx + 1..],
        None => qname,
    };
    String::from_utf8_lossy(bytes).into_owned()
}
