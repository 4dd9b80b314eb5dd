//! Built-in rule table. Order is priority: exact rules are always tried before
//! keyword rules, and among keyword rules the earlier entry wins.

use crate::kernel::event::Language;

use super::types::{MatchKind, MatchRule, Section};

pub const QUICK_QUESTION_EN: &str = "I have a question";
pub const QUICK_ABOUT_EN: &str = "Tell me more about you";
pub const QUICK_QUESTION_CN: &str = "我有一个问题";
pub const QUICK_ABOUT_CN: &str = "告诉我更多关于你的信息";

pub const DEFAULT_REPLY_EN: &str = "Thanks for your message! I'm not sure I understood that. \
You can ask me about my services, my projects, or how to get in touch.";
pub const DEFAULT_REPLY_CN: &str =
    "谢谢你的留言！我不太确定你的意思。你可以问我关于服务、项目或者联系方式的问题。";

pub fn default_reply(language: Language) -> &'static str {
    match language {
        Language::En => DEFAULT_REPLY_EN,
        Language::Cn => DEFAULT_REPLY_CN,
    }
}

pub static RULES: &[MatchRule] = &[
    // Quick-reply buttons send these verbatim.
    MatchRule {
        id: "quick.question",
        kind: MatchKind::Exact,
        language: Language::En,
        triggers: &[QUICK_QUESTION_EN],
        template: "<p>Of course! I'm happy to help.</p>\
<p>I design and build websites, web applications and interactive experiences, \
from the first sketch through to launch.</p>\
<p>Ask me about my services, the projects I've worked on, or how we could work together.</p>",
        navigation: None,
    },
    MatchRule {
        id: "quick.about",
        kind: MatchKind::Exact,
        language: Language::En,
        triggers: &[QUICK_ABOUT_EN],
        template: "<p>I'm a creative developer who loves building things for the web.</p>\
<p>My work sits where design meets engineering: motion, interaction and solid front-end architecture.</p>\
<p>Over the years I've shipped marketing sites, product dashboards and playful experiments.</p>\
<p>I care about performance, accessibility and the small details that make a page feel alive.</p>\
<p>Let me take you to the about section so you can read more.</p>",
        navigation: Some(Section::About),
    },
    MatchRule {
        id: "quick.question",
        kind: MatchKind::Exact,
        language: Language::Cn,
        triggers: &[QUICK_QUESTION_CN],
        template: "<p>当然！很乐意为你解答。</p>\
<p>我设计并开发网站、网页应用和互动体验，从最初的草图一直到正式上线。</p>\
<p>你可以问我提供哪些服务、做过哪些项目，或者我们如何合作。</p>",
        navigation: None,
    },
    MatchRule {
        id: "quick.about",
        kind: MatchKind::Exact,
        language: Language::Cn,
        triggers: &[QUICK_ABOUT_CN],
        template: "我是一名热爱网页开发的创意开发者。\n\n\
我的工作处在设计与工程的交汇处：动效、交互以及可靠的前端架构。\n\n\
这些年我交付过品牌官网、产品后台以及各种有趣的实验项目。\n\n\
我重视性能、无障碍以及让页面更有生命力的细节。\n\n\
我带你去“关于”部分看看更多内容。",
        navigation: Some(Section::About),
    },
    // English keyword rules.
    MatchRule {
        id: "greeting",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["hello", "hi there", "good morning", "good afternoon", "good evening"],
        template: "Hello! How can I help you today?",
        navigation: None,
    },
    MatchRule {
        id: "about",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["about", "who are you", "yourself", "background", "experience"],
        template: "<p>I'm a creative developer focused on interactive, animated websites.</p>\
<p>You'll find my story in the about section.</p>",
        navigation: Some(Section::About),
    },
    MatchRule {
        id: "services",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["service", "offer", "what do you do", "help with"],
        template: "<p>I offer web design, front-end development and motion design.</p>\
<p>Have a look at the services section for the details.</p>",
        navigation: Some(Section::Services),
    },
    MatchRule {
        id: "work",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["project", "portfolio", "work", "case stud"],
        template: "<p>Here are some of the projects I'm proud of.</p>\
<p>Each one links to a short case study.</p>",
        navigation: Some(Section::Work),
    },
    MatchRule {
        id: "pricing",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["price", "pricing", "cost", "budget", "rates", "quote"],
        template: "<p>Every project is different, so I quote per project.</p>\
<p>Send me a few details through the contact form and I'll get back to you with an estimate.</p>",
        navigation: Some(Section::Contact),
    },
    MatchRule {
        id: "contact",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["contact", "email", "hire", "reach", "get in touch", "question"],
        template: "You can reach me through the contact form below. I usually reply within a day.",
        navigation: Some(Section::Contact),
    },
    MatchRule {
        id: "thanks",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["thank", "thx", "cheers"],
        template: "You're welcome! Anything else I can help with?",
        navigation: None,
    },
    MatchRule {
        id: "farewell",
        kind: MatchKind::Keyword,
        language: Language::En,
        triggers: &["bye", "see you", "good night"],
        template: "Thanks for stopping by. Have a great day!",
        navigation: None,
    },
    // Chinese keyword rules.
    MatchRule {
        id: "greeting",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["你好", "您好", "嗨", "早上好", "晚上好"],
        template: "你好！今天有什么可以帮你的吗？",
        navigation: None,
    },
    MatchRule {
        id: "about",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["关于", "你是谁", "背景", "经验"],
        template: "<p>我是一名专注于互动和动效网站的创意开发者。</p>\
<p>在“关于”部分可以看到我的故事。</p>",
        navigation: Some(Section::About),
    },
    MatchRule {
        id: "services",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["服务", "提供"],
        template: "<p>我提供网页设计、前端开发和动效设计。</p>\
<p>详细内容请看服务部分。</p>",
        navigation: Some(Section::Services),
    },
    MatchRule {
        id: "work",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["项目", "作品", "案例"],
        template: "<p>这里有一些我引以为豪的项目。</p>\
<p>每个项目都附有简短的案例说明。</p>",
        navigation: Some(Section::Work),
    },
    MatchRule {
        id: "pricing",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["价格", "费用", "预算", "报价", "多少钱"],
        template: "<p>每个项目都不一样，所以我会按项目报价。</p>\
<p>通过联系表单告诉我一些细节，我会尽快给你一个估价。</p>",
        navigation: Some(Section::Contact),
    },
    MatchRule {
        id: "contact",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["联系", "邮箱", "邮件", "合作", "问题"],
        template: "你可以通过下方的联系表单找到我，我通常会在一天内回复。",
        navigation: Some(Section::Contact),
    },
    MatchRule {
        id: "thanks",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["谢谢", "感谢"],
        template: "不客气！还有什么可以帮你的吗？",
        navigation: None,
    },
    MatchRule {
        id: "farewell",
        kind: MatchKind::Keyword,
        language: Language::Cn,
        triggers: &["再见", "拜拜"],
        template: "感谢你的来访，祝你有美好的一天！",
        navigation: None,
    },
];
