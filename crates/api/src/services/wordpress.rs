//! WordPress plugin packager.
//!
//! Builds an in-memory zip containing a templated PHP plugin that enqueues
//! the embed script for a widget, plus a readme.txt. Values are injected by
//! placeholder substitution so PHP braces stay out of Rust format strings.

use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::ApiError;

/// Plugin archive version, embedded in the PHP header.
const PLUGIN_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PluginError> for ApiError {
    fn from(err: PluginError) -> Self {
        ApiError::Internal(format!("Plugin packaging failed: {}", err))
    }
}

/// Strip a widget name down to alphanumerics and single spaces, falling back
/// to a default when nothing survives.
pub fn sanitize_plugin_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        "AI Chat Widget".to_string()
    } else {
        collapsed
    }
}

/// Build the plugin zip for a widget. `embed_url` is the fully qualified
/// embed endpoint without the query string.
pub fn build_plugin_zip(
    widget_name: &str,
    api_key: &str,
    embed_url: &str,
) -> Result<Vec<u8>, PluginError> {
    let plugin_name = sanitize_plugin_name(widget_name);

    let php = PLUGIN_PHP_TEMPLATE
        .replace("__PLUGIN_NAME__", &plugin_name)
        .replace("__PLUGIN_VERSION__", PLUGIN_VERSION)
        .replace("__API_KEY__", api_key)
        .replace("__EMBED_URL__", embed_url);

    let readme = README_TEMPLATE
        .replace("__PLUGIN_NAME__", &plugin_name)
        .replace("__PLUGIN_VERSION__", PLUGIN_VERSION);

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file("ai-chat-widget/ai-chat-widget.php", options)?;
        zip.write_all(php.as_bytes())?;

        zip.start_file("ai-chat-widget/readme.txt", options)?;
        zip.write_all(readme.as_bytes())?;

        zip.finish()?;
    }
    Ok(buffer)
}

const PLUGIN_PHP_TEMPLATE: &str = r#"<?php
/**
 * Plugin Name: __PLUGIN_NAME__
 * Description: Adds an AI-powered chat widget to your WordPress site with voice and text capabilities.
 * Version: __PLUGIN_VERSION__
 * License: GPL v2 or later
 * License URI: https://www.gnu.org/licenses/gpl-2.0.html
 * Text Domain: ai-chat-widget
 */

// Prevent direct access
if (!defined('ABSPATH')) {
    exit;
}

define('AI_CHAT_WIDGET_VERSION', '__PLUGIN_VERSION__');
define('AI_CHAT_WIDGET_API_KEY', '__API_KEY__');
define('AI_CHAT_WIDGET_ENDPOINT', '__EMBED_URL__');

/**
 * Enqueue the widget script on the frontend
 */
function ai_chat_widget_enqueue_scripts() {
    $script_url = AI_CHAT_WIDGET_ENDPOINT . '?api_key=' . AI_CHAT_WIDGET_API_KEY;

    wp_enqueue_script(
        'ai-chat-widget',
        $script_url,
        array(),
        AI_CHAT_WIDGET_VERSION,
        true // Load in footer
    );
}
add_action('wp_enqueue_scripts', 'ai_chat_widget_enqueue_scripts');

/**
 * Display admin notice on activation
 */
function ai_chat_widget_activation_notice() {
    if (get_transient('ai_chat_widget_activation_notice')) {
        ?>
        <div class="notice notice-success is-dismissible">
            <p><strong>__PLUGIN_NAME__</strong> has been activated! The chat widget will now appear on your site.</p>
        </div>
        <?php
        delete_transient('ai_chat_widget_activation_notice');
    }
}
add_action('admin_notices', 'ai_chat_widget_activation_notice');

/**
 * Set transient on activation
 */
function ai_chat_widget_activate() {
    set_transient('ai_chat_widget_activation_notice', true, 5);
}
register_activation_hook(__FILE__, 'ai_chat_widget_activate');
"#;

const README_TEMPLATE: &str = r#"=== __PLUGIN_NAME__ ===
Tags: chat, ai, chatbot, voice, assistant
Requires at least: 5.0
Tested up to: 6.5
Stable tag: __PLUGIN_VERSION__
License: GPLv2 or later

Adds an AI-powered chat widget with voice and text capabilities to your site.

== Description ==

Installs the embeddable AI widget on every page. The widget is configured
from your dashboard; no settings live in WordPress itself.

== Installation ==

1. Upload the plugin zip via Plugins > Add New > Upload Plugin.
2. Activate the plugin.
3. The widget appears on your site immediately.
"#;
