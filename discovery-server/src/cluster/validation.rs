//! Node registration payload checks

use crate::core::{Node, ValidationError};
use url::Url;

/// Validate a node before registration.
///
/// Checks run in a fixed order: address presence, name presence, then address
/// syntax. A node with neither name nor address reports `AddressMissing`.
pub fn validate_node(node: &Node) -> Result<(), ValidationError> {
    if node.advertise_address.is_empty() {
        return Err(ValidationError::AddressMissing);
    }

    if node.name.is_empty() {
        return Err(ValidationError::NameMissing);
    }

    if !is_valid_address(&node.advertise_address) {
        return Err(ValidationError::InvalidAddress);
    }

    Ok(())
}

/// Accepts absolute URLs with a host (`http://10.0.0.1:5705`) and bare
/// `host[:port]` forms (`10.0.0.1`, `node-1.local:5705`, `[::1]:80`).
pub fn is_valid_address(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }

    if address.contains("://") {
        return Url::parse(address).is_ok_and(|url| url.host_str().is_some_and(|h| !h.is_empty()));
    }

    match Url::parse(&format!("tcp://{address}")) {
        Ok(url) => {
            url.host_str().is_some_and(|h| !h.is_empty())
                && matches!(url.path(), "" | "/")
                && url.query().is_none()
                && url.fragment().is_none()
                && url.username().is_empty()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_node() {
        let node = Node::new("1", "node1", "192.168.0.1");
        assert_eq!(validate_node(&node), Ok(()));
    }

    #[test]
    fn test_address_checked_before_name() {
        let node = Node::new("1", "", "");
        assert_eq!(validate_node(&node), Err(ValidationError::AddressMissing));
    }

    #[test]
    fn test_name_missing() {
        let node = Node::new("1", "", "192.168.0.1");
        assert_eq!(validate_node(&node), Err(ValidationError::NameMissing));
    }

    #[test]
    fn test_name_checked_before_syntax() {
        let node = Node::new("1", "", "not an address");
        assert_eq!(validate_node(&node), Err(ValidationError::NameMissing));
    }

    #[test]
    fn test_invalid_address() {
        let node = Node::new("1", "node1", "not an address");
        assert_eq!(validate_node(&node), Err(ValidationError::InvalidAddress));
    }

    #[test]
    fn test_address_forms() {
        for ok in [
            "192.168.0.4",
            "10.0.1.4:5705",
            "node-1.cluster.local",
            "node-1.cluster.local:5705",
            "[::1]:8080",
            "http://10.0.0.1:5705",
            "tcp://node-1:5705",
        ] {
            assert!(is_valid_address(ok), "expected {ok} to be valid");
        }

        for bad in [
            "10.0.0.1:notaport",
            "10.0.0.1/path",
            "http://",
            "host name",
            "10.0.0.1?x=1",
            "user@10.0.0.1",
        ] {
            assert!(!is_valid_address(bad), "expected {bad} to be invalid");
        }
    }
}
