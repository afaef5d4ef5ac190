use crate::events::WindowInfo;
use crate::error::{SeqError, Result};
use serde_json::Value;
use tokio::process::Command;

pub struct SwayDetector;

impl SwayDetector {
    pub fn new() -> Self {
        Self
    }

    pub async fn test(&self) -> Result<()> {
        let output = Command::new("swaymsg").args(["-t", "get_tree"]).output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(SeqError::ServiceUnavailable("sway failed".to_string()))
        }
    }

    pub async fn get_active_window(&self) -> Result<WindowInfo> {
        let output = Command::new("swaymsg")
            .args(["-t", "get_tree"])
            .output()
            .await
            .map_err(|e| SeqError::ServiceUnavailable(format!("swaymsg не найден: {}", e)))?;

        if !output.status.success() {
            return Err(SeqError::ServiceUnavailable("swaymsg вернул ошибку".to_string()));
        }

        parse_focused_name(&String::from_utf8_lossy(&output.stdout))
            .map(WindowInfo::new)
            .ok_or_else(|| SeqError::ServiceUnavailable("Активное окно в Sway не найдено".to_string()))
    }
}

/// Имя узла с `focused: true` в дереве `swaymsg -t get_tree`
fn parse_focused_name(tree: &str) -> Option<String> {
    let root: Value = serde_json::from_str(tree).ok()?;
    let mut stack = vec![&root];

    while let Some(node) = stack.pop() {
        if node.get("focused").and_then(Value::as_bool) == Some(true) {
            return node.get("name").and_then(Value::as_str).map(str::to_string);
        }

        for children in ["nodes", "floating_nodes"] {
            if let Some(Value::Array(nodes)) = node.get(children) {
                stack.extend(nodes.iter());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"{
  "id": 1,
  "name": "root",
  "type": "root",
  "focused": false,
  "nodes": [
    {
      "id": 3,
      "name": "eDP-1",
      "type": "output",
      "focused": false,
      "nodes": [
        {
          "id": 4,
          "name": "1",
          "type": "workspace",
          "focused": false,
          "nodes": [
            {
              "id": 7,
              "name": "vim",
              "type": "con",
              "focused": false,
              "nodes": []
            },
            {
              "id": 8,
              "type": "con",
              "focused": true,
              "name": "Mozilla Firefox",
              "app_id": "firefox",
              "nodes": []
            }
          ],
          "floating_nodes": []
        }
      ]
    }
  ]
}"#;

    #[test]
    fn test_parse_focused_name_pretty_tree() {
        assert_eq!(parse_focused_name(TREE), Some("Mozilla Firefox".to_string()));
    }

    #[test]
    fn test_parse_focused_floating_node() {
        let tree = r#"{"name": "root", "focused": false, "nodes": [
            {"name": "1", "focused": false, "nodes": [],
             "floating_nodes": [{"focused": true, "name": "pavucontrol", "nodes": []}]}
        ]}"#;
        assert_eq!(parse_focused_name(tree), Some("pavucontrol".to_string()));
    }

    #[test]
    fn test_parse_without_focus() {
        assert_eq!(parse_focused_name(r#"{"name": "root", "focused": false, "nodes": []}"#), None);
        assert_eq!(parse_focused_name("not json"), None);
    }
}
