//! Outline sources used across the integration tests.

use std::sync::Arc;

use ned::{DiagnosticCollector, Element, ParseOptions, parse_ned_text};

use super::outline_engine::OutlineEngine;

pub const CHANNELS: &str = "\
ned-file filename=ned/channels.ned
  package name=ned
  channel name=IdealChannel
  channel name=DatarateChannel
    parameters
      param type=double name=delay
      param type=double name=datarate
";

pub const NODES: &str = "\
ned-file filename=lib/nodes.ned
  package name=lib
  module-interface name=INode
    gates
      gate name=in type=input
      gate name=out type=output
  simple-module name=Node
    interface-name name=INode
    parameters
      param type=double name=delay
    gates
      gate name=in type=input
      gate name=out type=output
      gate name=port type=inout
";

pub const NETWORK: &str = "\
ned-file filename=app/net.ned
  package name=app
  import import-spec=lib.*
  compound-module name=Net
    gates
      gate name=in type=input
    submodules
      submodule name=a type=Node
        parameters
          param name=delay value=1s
      submodule name=b type=Node
      submodule name=c like-type=INode like-param=cType
    connections
      connection src-gate=in dest-module=a dest-gate=in arrow-direction=l2r
      connection src-module=a src-gate=out dest-module=b dest-gate=in arrow-direction=l2r
        channel-spec
          parameters
            param name=datarate value=1Mbps
      connection src-module=b src-gate=out dest-module=c dest-gate=in arrow-direction=l2r
";

/// Parse an outline with default options, panicking on bridge errors.
pub fn parse(text: &str, display_name: &str) -> (Arc<Element>, DiagnosticCollector) {
    let mut engine = OutlineEngine::new();
    let mut sink = DiagnosticCollector::new();
    let root = parse_ned_text(&mut engine, text, display_name, &ParseOptions::default(), &mut sink)
        .unwrap();
    (root, sink)
}
