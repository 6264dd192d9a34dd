//! Comments and reactions widget.
//!
//! The widget is a handful of placeholder elements plus a module script that
//! talks to a hosted backend from the reader's browser. The script is stored
//! as a [`Template`]; the only thing rendering does to it is substitute the
//! configured project identifiers.

use ivan_core::config::CommentsConfig;
use serde_json::Value;
use tracing::debug;

use crate::{
    node::{Element, Node},
    template::{Result, Template, TemplateContext},
};

/// Default client script. Identifiers arrive as JSON literals.
pub const DEFAULT_COMMENTS_SCRIPT: &str = r#"
  import { initializeApp } from 'https://www.gstatic.com/firebasejs/{{ sdk_version }}/firebase-app.js';
  import { getAuth, signInAnonymously, GoogleAuthProvider, signInWithPopup, onAuthStateChanged } from 'https://www.gstatic.com/firebasejs/{{ sdk_version }}/firebase-auth.js';
  import { getFirestore, doc, getDoc, setDoc, updateDoc, increment, collection, addDoc, onSnapshot, serverTimestamp, query, orderBy } from 'https://www.gstatic.com/firebasejs/{{ sdk_version }}/firebase-firestore.js';

  // Replace with your Firebase project configuration
  const firebaseConfig = {
    apiKey: {{ api_key }},
    authDomain: {{ auth_domain }},
    projectId: {{ project_id }},
    storageBucket: {{ storage_bucket }},
    messagingSenderId: {{ messaging_sender_id }},
    appId: {{ app_id }}
  };

  const app = initializeApp(firebaseConfig);
  const auth = getAuth(app);
  const db = getFirestore(app);
  let currentUser = null;

  // Use the path as a stable post id (e.g. /posts/my-article)
  const postId = window.location.pathname;

  // Ensure an auth session exists (anonymous by default)
  signInAnonymously(auth).catch(console.error);

  const loginStatus = document.getElementById('loginStatus');
  const reactionsDiv = document.getElementById('reactions');
  const googleBtn = document.getElementById('googleLogin');
  const commentsList = document.getElementById('commentsList');
  const commentForm = document.getElementById('commentForm');
  const commentInput = document.getElementById('commentInput');

  onAuthStateChanged(auth, (user) => {
    if (!user) return;
    currentUser = user;
    loginStatus.textContent = user.isAnonymous ? 'You are browsing anonymously' : `Logged in as ${user.displayName || user.email}`;
  });

  // Optional Google sign-in
  googleBtn?.addEventListener('click', async () => {
    try {
      const provider = new GoogleAuthProvider();
      await signInWithPopup(auth, provider);
    } catch (e) { console.error(e); }
  });

  // Emoji reactions (customize the set as you wish)
  const emojis = {{ reactions }};
  for (const emoji of emojis) {
    const ref = doc(db, `posts/${postId}/reactions/${emoji}`);
    const snap = await getDoc(ref);
    let count = snap.exists() ? snap.data().count : 0;

    const btn = document.createElement('button');
    btn.textContent = `${emoji} ${count}`;
    btn.style.marginRight = '8px';
    btn.style.padding = '6px 10px';
    btn.style.borderRadius = '999px';

    btn.onclick = async () => {
      try {
        await setDoc(ref, { count: increment(1) }, { merge: true });
      } catch (e) { console.error(e); }
    };

    reactionsDiv.appendChild(btn);

    // Live updates for each emoji
    onSnapshot(ref, (docSnap) => {
      if (docSnap.exists()) {
        btn.textContent = `${emoji} ${docSnap.data().count}`;
      }
    });
  }

  // Comments: submit
  commentForm?.addEventListener('submit', async (e) => {
    e.preventDefault();
    if (!currentUser) return;
    const text = (commentInput?.value || '').trim();
    if (!text) return;
    try {
      await addDoc(collection(db, `posts/${postId}/comments`), {
        text,
        userName: currentUser.displayName || 'Anonymous',
        userId: currentUser.uid,
        createdAt: serverTimestamp()
      });
      commentInput.value = '';
    } catch (e) { console.error(e); }
  });

  // Live comments feed (newest first)
  const q = query(collection(db, `posts/${postId}/comments`), orderBy('createdAt', 'desc'));
  onSnapshot(q, (snapshot) => {
    commentsList.innerHTML = '';
    snapshot.forEach((doc) => {
      const c = doc.data();
      const li = document.createElement('li');
      const when = c.createdAt?.toDate ? c.createdAt.toDate().toLocaleString() : '';
      li.textContent = `${c.userName || 'Anonymous'}: ${c.text} ${when ? '— ' + when : ''}`;
      commentsList.appendChild(li);
    });
  });
"#;

/// The comments and reactions widget for item pages.
#[derive(Debug, Clone)]
pub struct CommentsWidget {
    script: String,
}

impl CommentsWidget {
    /// Build the widget with the default client script.
    pub fn new(config: &CommentsConfig) -> Result<Self> {
        Self::with_template(
            config,
            &Template::new("comments-script", DEFAULT_COMMENTS_SCRIPT),
        )
    }

    /// Build the widget with a custom client script.
    ///
    /// The template sees `sdk_version`, the six project identifiers and
    /// `reactions`. Identifiers and reactions are JSON literals.
    pub fn with_template(config: &CommentsConfig, template: &Template) -> Result<Self> {
        let ctx = TemplateContext::new()
            .with_var("sdk_version", &config.sdk_version)
            .with_var("api_key", js_literal(Value::from(config.api_key.as_str())))
            .with_var("auth_domain", js_literal(Value::from(config.auth_domain.as_str())))
            .with_var("project_id", js_literal(Value::from(config.project_id.as_str())))
            .with_var("storage_bucket", js_literal(Value::from(config.storage_bucket.as_str())))
            .with_var(
                "messaging_sender_id",
                js_literal(Value::from(config.messaging_sender_id.as_str())),
            )
            .with_var("app_id", js_literal(Value::from(config.app_id.as_str())))
            .with_var("reactions", js_literal(Value::from(config.reactions.clone())));

        let script = template.render(&ctx)?;
        debug!(template = template.name(), project = %config.project_id, "comments script rendered");

        Ok(Self { script })
    }

    /// Reactions bar, login controls, comment form and comment list.
    #[must_use]
    pub fn controls(&self) -> Node {
        Node::fragment([
            Element::new("div").id("reactions").into(),
            Element::new("p").id("loginStatus").into(),
            Element::new("button")
                .id("googleLogin")
                .child("Sign in with Google")
                .into(),
            Element::new("form")
                .id("commentForm")
                .child(
                    Element::new("div")
                        .attr("style", "margin: 12px 0; display:flex; gap:8px;")
                        .child(
                            Element::new("input")
                                .id("commentInput")
                                .attr("placeholder", "Write a comment")
                                .attr("aria-label", "Comment")
                                .attr(
                                    "style",
                                    "flex:1; padding:8px 10px; border-radius:10px; border:1px solid #ddd;",
                                ),
                        )
                        .child(
                            Element::new("button")
                                .attr("type", "submit")
                                .child("Post Comment"),
                        ),
                )
                .into(),
            Element::new("ul").id("commentsList").into(),
        ])
    }

    /// The module script driving the controls.
    #[must_use]
    pub fn script(&self) -> Node {
        Element::new("script")
            .attr("type", "module")
            .child(Node::raw(self.script.as_str()))
            .into()
    }
}

/// JSON text that is also safe inside an inline `<script>`.
///
/// `<` and `>` only occur inside string literals in JSON output, where the
/// `\u003c` / `\u003e` escapes decode to the same characters but cannot
/// form `</script>`, `<!--` or `-->`.
fn js_literal(value: Value) -> String {
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}
