//! Embeddable widget script generator.
//!
//! Renders the self-installing browser script served by `GET /widget-embed`.
//! The script is assembled from typed props: every dynamic value is injected
//! as JSON into a fixed template, so user-controlled data can never change
//! the script's structure. The call-state transition table is serialized
//! from the domain model rather than re-stated here.
//!
//! Client-side behavior:
//! - `sdkLoaded` and `configLoaded` flip independently; `tryInitWidget` runs
//!   after each and initializes exactly once when both are set.
//! - SDK dependencies load sequentially, each gated on the previous; every
//!   outcome lands in a capped diagnostics ring buffer. A failure degrades
//!   the widget to chat-only instead of blocking it.
//! - The buffer is exposed at `window.__widgetDiagnostics` for support use;
//!   no panel is attached to the DOM.

use serde_json::json;

use domain::services::call_flow;

/// Capacity of the in-browser diagnostics ring buffer.
pub const DIAGNOSTICS_CAPACITY: usize = 20;

/// A browser-side SDK dependency, loaded as a script tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkDependency {
    pub name: &'static str,
    pub url: &'static str,
}

/// SDK dependencies in load order. Each depends on the previous: the vendor
/// SDK needs the realtime transport, which needs the EventEmitter polyfill.
pub fn sdk_dependencies() -> [SdkDependency; 3] {
    [
        SdkDependency {
            name: "eventemitter",
            url: "https://cdn.jsdelivr.net/npm/eventemitter3@5.0.1/dist/eventemitter3.umd.min.js",
        },
        SdkDependency {
            name: "livekit-client",
            url: "https://cdn.jsdelivr.net/npm/livekit-client@2.5.7/dist/livekit-client.umd.min.js",
        },
        SdkDependency {
            name: "retell-sdk",
            url: "https://cdn.jsdelivr.net/npm/retell-client-js-sdk@2.0.5/dist/index.umd.min.js",
        },
    ]
}

/// Typed inputs of the generated script.
#[derive(Debug, Clone)]
pub struct EmbedScriptProps {
    /// Widget API key, already format-validated by the extractor.
    pub api_key: String,
    /// Public base URL of this service (no trailing slash).
    pub base_url: String,
}

/// Render the embeddable widget script for the given props.
pub fn render_embed_script(props: &EmbedScriptProps) -> String {
    let dependencies = json!(sdk_dependencies()
        .iter()
        .map(|d| json!({ "name": d.name, "url": d.url }))
        .collect::<Vec<_>>());

    SCRIPT_TEMPLATE
        .replace("__API_KEY__", &json!(props.api_key).to_string())
        .replace("__BASE_URL__", &json!(props.base_url).to_string())
        .replace("__SDK_DEPENDENCIES__", &dependencies.to_string())
        .replace(
            "__CALL_TRANSITIONS__",
            &call_flow::transition_table_json().to_string(),
        )
        .replace("__DIAGNOSTICS_CAPACITY__", &DIAGNOSTICS_CAPACITY.to_string())
}

const SCRIPT_TEMPLATE: &str = r##"(function () {
  "use strict";

  var API_KEY = __API_KEY__;
  var BASE_URL = __BASE_URL__;
  var SDK_DEPENDENCIES = __SDK_DEPENDENCIES__;
  var CALL_TRANSITIONS = __CALL_TRANSITIONS__;
  var DIAGNOSTICS_CAPACITY = __DIAGNOSTICS_CAPACITY__;

  // Capped diagnostics ring buffer. Exposed for support tooling; never
  // rendered into the page.
  var diagnostics = [];
  window.__widgetDiagnostics = diagnostics;
  function recordDiagnostic(step, ok, detail) {
    diagnostics.push({ step: step, ok: ok, detail: detail, at: Date.now() });
    while (diagnostics.length > DIAGNOSTICS_CAPACITY) diagnostics.shift();
    if (!ok) console.warn("AIWidget: " + step + " - " + detail);
  }

  var sdkLoaded = false;
  var configLoaded = false;
  var voiceReady = false;
  var widgetConfig = null;
  var initialized = false;

  // No-op until both readiness flags are set; initializes exactly once.
  function tryInitWidget() {
    if (initialized || !sdkLoaded || !configLoaded) return;
    initialized = true;
    initWidget(widgetConfig);
  }

  function loadScript(dep) {
    return new Promise(function (resolve, reject) {
      var el = document.createElement("script");
      el.src = dep.url;
      el.async = true;
      el.onload = function () { resolve(); };
      el.onerror = function () { reject(new Error("failed to load " + dep.name)); };
      document.head.appendChild(el);
    });
  }

  // Sequential, each load gated on the previous. A failure skips the rest,
  // leaves voice disabled, and still marks the SDK phase finished so the
  // widget comes up chat-only.
  async function loadDependencies() {
    var allLoaded = true;
    for (var i = 0; i < SDK_DEPENDENCIES.length; i++) {
      var dep = SDK_DEPENDENCIES[i];
      try {
        await loadScript(dep);
        recordDiagnostic("sdk:" + dep.name, true, "loaded");
      } catch (err) {
        recordDiagnostic("sdk:" + dep.name, false, String(err && err.message || err));
        allLoaded = false;
        break;
      }
    }
    voiceReady = allLoaded && typeof window.RetellWebClient === "function";
    if (allLoaded && !voiceReady) {
      recordDiagnostic("sdk:retell-sdk", false, "RetellWebClient constructor missing");
    }
    sdkLoaded = true;
    tryInitWidget();
  }

  function loadConfig() {
    fetch(BASE_URL + "/widget-config?api_key=" + encodeURIComponent(API_KEY))
      .then(function (res) { return res.json(); })
      .then(function (config) {
        if (config.error) {
          recordDiagnostic("config", false, config.message || config.error);
          return;
        }
        widgetConfig = config;
        configLoaded = true;
        recordDiagnostic("config", true, "loaded");
        tryInitWidget();
      })
      .catch(function (err) {
        recordDiagnostic("config", false, "fetch failed: " + err);
      });
  }

  loadConfig();
  loadDependencies();

  function initWidget(config) {
    var primaryColor = config.primary_color || "#14b8a6";
    var backgroundColor = config.background_color || "#1a1a2e";
    var textColor = config.text_color || "#ffffff";
    var position = config.position === "bottom-left" ? "bottom-left" : "bottom-right";

    var style = document.createElement("style");
    style.textContent = [
      ".aiw-container { position: fixed; bottom: 24px; z-index: 999999; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }",
      ".aiw-container.bottom-right { right: 24px; }",
      ".aiw-container.bottom-left { left: 24px; }",
      ".aiw-btn { width: 56px; height: 56px; border-radius: 50%; border: none; cursor: pointer; display: flex; align-items: center; justify-content: center; box-shadow: 0 4px 20px rgba(0,0,0,0.2); transition: transform 0.2s; }",
      ".aiw-btn:hover { transform: scale(1.05); }",
      ".aiw-btn svg { width: 24px; height: 24px; fill: white; }",
      ".aiw-panel { position: absolute; bottom: 70px; width: 360px; max-height: 540px; border-radius: 16px; box-shadow: 0 10px 40px rgba(0,0,0,0.3); overflow: hidden; transition: opacity 0.3s, transform 0.3s; }",
      ".aiw-panel.bottom-right { right: 0; }",
      ".aiw-panel.bottom-left { left: 0; }",
      ".aiw-panel.aiw-hidden { opacity: 0; transform: translateY(10px); pointer-events: none; }",
      ".aiw-header { padding: 16px; border-bottom: 1px solid rgba(255,255,255,0.1); display: flex; align-items: center; justify-content: space-between; }",
      ".aiw-title { font-weight: 600; font-size: 14px; }",
      ".aiw-status { font-size: 12px; opacity: 0.6; }",
      ".aiw-close { background: none; border: none; padding: 8px; cursor: pointer; border-radius: 8px; }",
      ".aiw-close svg { width: 20px; height: 20px; fill: currentColor; opacity: 0.6; }",
      ".aiw-voice { padding: 12px 16px; border-bottom: 1px solid rgba(255,255,255,0.1); display: flex; align-items: center; gap: 12px; }",
      ".aiw-voice-btn { border: none; border-radius: 12px; padding: 10px 16px; cursor: pointer; color: white; font-size: 13px; }",
      ".aiw-voice-btn:disabled { opacity: 0.5; cursor: not-allowed; }",
      ".aiw-voice-status { font-size: 12px; opacity: 0.7; flex: 1; }",
      ".aiw-bars { display: flex; gap: 3px; align-items: flex-end; height: 20px; }",
      ".aiw-bars span { width: 4px; background: currentColor; border-radius: 2px; height: 4px; transition: height 0.1s; }",
      ".aiw-messages { height: 300px; overflow-y: auto; padding: 16px; display: flex; flex-direction: column; gap: 12px; }",
      ".aiw-msg { max-width: 85%; padding: 12px; border-radius: 16px; font-size: 14px; line-height: 1.4; animation: aiw-fade-in 0.3s; }",
      ".aiw-msg.user { margin-left: auto; border-bottom-right-radius: 4px; color: white; }",
      ".aiw-msg.agent { margin-right: auto; background: rgba(255,255,255,0.1); border-bottom-left-radius: 4px; }",
      ".aiw-input-area { padding: 12px; border-top: 1px solid rgba(255,255,255,0.1); display: flex; gap: 8px; }",
      ".aiw-input { flex: 1; background: rgba(255,255,255,0.1); border: 1px solid rgba(255,255,255,0.2); border-radius: 12px; padding: 10px 16px; font-size: 14px; color: inherit; outline: none; }",
      ".aiw-send { background: none; border: none; padding: 10px; border-radius: 12px; cursor: pointer; }",
      ".aiw-send:disabled { opacity: 0.5; cursor: not-allowed; }",
      ".aiw-send svg { width: 20px; height: 20px; }",
      ".aiw-typing { display: flex; gap: 4px; padding: 12px; }",
      ".aiw-typing span { width: 8px; height: 8px; background: rgba(255,255,255,0.4); border-radius: 50%; animation: aiw-bounce 1.4s infinite; }",
      ".aiw-typing span:nth-child(2) { animation-delay: 0.2s; }",
      ".aiw-typing span:nth-child(3) { animation-delay: 0.4s; }",
      ".aiw-footer { padding: 8px; text-align: center; font-size: 11px; opacity: 0.5; }",
      ".aiw-footer a { color: inherit; }",
      "@keyframes aiw-fade-in { from { opacity: 0; transform: translateY(10px); } to { opacity: 1; transform: translateY(0); } }",
      "@keyframes aiw-bounce { 0%, 80%, 100% { transform: translateY(0); } 40% { transform: translateY(-6px); } }"
    ].join("\n");
    document.head.appendChild(style);

    var CHAT_ICON = '<svg viewBox="0 0 24 24"><path d="M20 2H4c-1.1 0-2 .9-2 2v18l4-4h14c1.1 0 2-.9 2-2V4c0-1.1-.9-2-2-2z"/></svg>';
    var CLOSE_ICON = '<svg viewBox="0 0 24 24"><path d="M19 6.41L17.59 5 12 10.59 6.41 5 5 6.41 10.59 12 5 17.59 6.41 19 12 13.41 17.59 19 19 17.59 13.41 12z"/></svg>';
    var SEND_ICON = '<svg viewBox="0 0 24 24" fill="white"><path d="M2.01 21L23 12 2.01 3 2 10l15 2-15 2z"/></svg>';

    function el(tag, className, text) {
      var node = document.createElement(tag);
      if (className) node.className = className;
      if (text) node.textContent = text;
      return node;
    }

    var container = el("div", "aiw-container " + position);
    var panel = el("div", "aiw-panel " + position + " aiw-hidden");
    panel.style.background = backgroundColor;
    panel.style.color = textColor;

    // Header
    var header = el("div", "aiw-header");
    var headerInfo = el("div");
    headerInfo.appendChild(el("div", "aiw-title", config.title || "AI Assistant"));
    headerInfo.appendChild(el("div", "aiw-status", "Online now"));
    var closeBtn = el("button", "aiw-close");
    closeBtn.innerHTML = CLOSE_ICON;
    header.appendChild(headerInfo);
    header.appendChild(closeBtn);
    panel.appendChild(header);

    // Voice pane
    var voiceEnabled = voiceReady && config.enable_voice !== false;
    var voiceBtn = null;
    var voiceStatus = null;
    var bars = null;
    if (voiceEnabled) {
      var voice = el("div", "aiw-voice");
      voiceBtn = el("button", "aiw-voice-btn", "Start call");
      voiceBtn.style.background = primaryColor;
      voiceStatus = el("div", "aiw-voice-status", "Talk to us live");
      bars = el("div", "aiw-bars");
      for (var b = 0; b < 5; b++) bars.appendChild(el("span"));
      voice.appendChild(voiceBtn);
      voice.appendChild(voiceStatus);
      voice.appendChild(bars);
      panel.appendChild(voice);
    }

    // Chat pane
    var chatEnabled = config.enable_chat !== false;
    var messages = null;
    var input = null;
    var sendBtn = null;
    if (chatEnabled) {
      messages = el("div", "aiw-messages");
      var inputArea = el("div", "aiw-input-area");
      input = el("input", "aiw-input");
      input.type = "text";
      input.placeholder = "Type a message...";
      sendBtn = el("button", "aiw-send");
      sendBtn.style.background = primaryColor;
      sendBtn.innerHTML = SEND_ICON;
      inputArea.appendChild(input);
      inputArea.appendChild(sendBtn);
      panel.appendChild(messages);
      panel.appendChild(inputArea);
    }

    // Attribution footer
    if (config.attribution_text) {
      var footer = el("div", "aiw-footer");
      if (config.attribution_link) {
        var link = el("a", null, config.attribution_text);
        link.href = config.attribution_link;
        link.target = "_blank";
        link.rel = "noopener";
        footer.appendChild(link);
      } else {
        footer.textContent = config.attribution_text;
      }
      panel.appendChild(footer);
    }

    var toggleBtn = el("button", "aiw-btn");
    toggleBtn.style.background = primaryColor;
    toggleBtn.innerHTML = CHAT_ICON;

    container.appendChild(panel);
    container.appendChild(toggleBtn);
    document.body.appendChild(container);

    var isOpen = false;
    toggleBtn.onclick = function () {
      isOpen = !isOpen;
      panel.classList.toggle("aiw-hidden", !isOpen);
      toggleBtn.innerHTML = isOpen ? CLOSE_ICON : CHAT_ICON;
      if (isOpen && input) input.focus();
    };
    closeBtn.onclick = function () {
      isOpen = false;
      panel.classList.add("aiw-hidden");
      toggleBtn.innerHTML = CHAT_ICON;
    };

    // ---- Chat flow ----

    var chatId = null;
    var isSending = false;

    function addMessage(role, text) {
      if (!messages) return null;
      var msg = el("div", "aiw-msg " + role, text);
      if (role === "user") msg.style.background = primaryColor;
      messages.appendChild(msg);
      messages.scrollTop = messages.scrollHeight;
      return msg;
    }

    function showTyping() {
      var typing = el("div", "aiw-msg agent aiw-typing");
      typing.innerHTML = "<span></span><span></span><span></span>";
      messages.appendChild(typing);
      messages.scrollTop = messages.scrollHeight;
      return typing;
    }

    function sendMessage() {
      var text = input.value.trim();
      if (!text || isSending) return;
      if (text.length > 4000) {
        addMessage("agent", "That message is too long. Please keep it under 4000 characters.");
        return;
      }

      addMessage("user", text);
      input.value = "";
      isSending = true;
      sendBtn.disabled = true;

      var typing = showTyping();

      fetch(BASE_URL + "/retell-text-chat", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ api_key: API_KEY, message: text, chat_id: chatId })
      })
        .then(function (res) { return res.json(); })
        .then(function (data) {
          typing.remove();
          if (data.chat_id) chatId = data.chat_id;
          if (data.response) addMessage("agent", data.response);
          if (data.error) addMessage("agent", "Sorry, something went wrong. Please try again.");
        })
        .catch(function () {
          typing.remove();
          addMessage("agent", "Sorry, I couldn't connect. Please try again.");
        })
        .finally(function () {
          isSending = false;
          sendBtn.disabled = false;
        });
    }

    if (chatEnabled) {
      addMessage("agent", config.greeting || "Hi! How can I help you today?");
      sendBtn.onclick = sendMessage;
      input.onkeydown = function (e) {
        if (e.key === "Enter" && !e.shiftKey) {
          e.preventDefault();
          sendMessage();
        }
      };
    }

    // ---- Voice call flow ----

    var callState = "idle";
    var isAgentSpeaking = false;
    var retellClient = null;
    var barsTimer = null;

    // Transitions come from the generated table; unknown events in a state
    // are no-ops. There is no idle -> active edge.
    function applyCallEvent(event) {
      var next = (CALL_TRANSITIONS[callState] || {})[event];
      if (!next) return false;
      callState = next;
      renderCallState();
      return true;
    }

    function renderCallState() {
      if (!voiceBtn) return;
      if (callState === "idle") {
        voiceBtn.textContent = "Start call";
        voiceBtn.disabled = false;
      } else if (callState === "connecting") {
        voiceBtn.textContent = "Connecting...";
        voiceBtn.disabled = true;
      } else {
        voiceBtn.textContent = "End call";
        voiceBtn.disabled = false;
      }
    }

    function setVoiceStatus(text) {
      if (voiceStatus) voiceStatus.textContent = text;
    }

    // Cosmetic only: randomized bar heights, not a real amplitude readout.
    function animateBars() {
      if (!bars) return;
      var spans = bars.children;
      for (var i = 0; i < spans.length; i++) {
        var h = isAgentSpeaking ? 4 + Math.floor(Math.random() * 16) : 4;
        spans[i].style.height = h + "px";
      }
    }

    function startBars() {
      if (barsTimer) return;
      barsTimer = setInterval(animateBars, 120);
    }

    function stopBars() {
      if (barsTimer) {
        clearInterval(barsTimer);
        barsTimer = null;
      }
      isAgentSpeaking = false;
      animateBars();
    }

    function ensureClient() {
      if (retellClient) return retellClient;
      retellClient = new window.RetellWebClient();
      retellClient.on("call_started", function () {
        applyCallEvent("call_started");
        setVoiceStatus("Connected");
        startBars();
      });
      retellClient.on("call_ended", function () {
        applyCallEvent("call_ended");
        setVoiceStatus("Call ended");
        stopBars();
      });
      retellClient.on("agent_start_talking", function () { isAgentSpeaking = true; });
      retellClient.on("agent_stop_talking", function () { isAgentSpeaking = false; });
      retellClient.on("error", function (err) {
        recordDiagnostic("call", false, String(err));
        applyCallEvent("connect_failed");
        applyCallEvent("stop_requested");
        setVoiceStatus("Call failed. Please try again.");
        stopBars();
      });
      return retellClient;
    }

    function startCall() {
      if (!applyCallEvent("start_requested")) return;
      setVoiceStatus("Requesting microphone...");

      navigator.mediaDevices.getUserMedia({ audio: true })
        .then(function () {
          setVoiceStatus("Connecting...");
          return fetch(BASE_URL + "/retell-create-call", {
            method: "POST",
            headers: { "Content-Type": "application/json" },
            body: JSON.stringify({ api_key: API_KEY })
          });
        })
        .then(function (res) { return res.json(); })
        .then(function (data) {
          if (!data.access_token) throw new Error(data.message || "no access token");
          return ensureClient().startCall({ accessToken: data.access_token });
        })
        .catch(function (err) {
          // Permission denial and setup failures both fail closed to idle.
          var denied = err && (err.name === "NotAllowedError" || err.name === "PermissionDeniedError");
          applyCallEvent(denied ? "microphone_denied" : "connect_failed");
          setVoiceStatus(denied
            ? "Microphone access is needed to start a call."
            : "Could not start the call. Please try again.");
          recordDiagnostic("call", false, String(err));
        });
    }

    function stopCall() {
      if (retellClient) retellClient.stopCall();
      applyCallEvent("stop_requested");
      setVoiceStatus("Call ended");
      stopBars();
    }

    if (voiceBtn) {
      voiceBtn.onclick = function () {
        if (callState === "idle") startCall();
        else if (callState === "active") stopCall();
      };
      renderCallState();
    }
  }
})();
"##;
