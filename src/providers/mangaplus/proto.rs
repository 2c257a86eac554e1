//! Protobuf messages of the MangaPlus API
//!
//! Only the fields the provider reads are declared; prost skips unknown fields.

/// Upstream content language
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Language {
    English = 0,
    Spanish = 1,
    French = 2,
    Indonesian = 3,
    PortugueseBr = 4,
    Russian = 5,
    Thai = 6,
    German = 7,
    Italian = 8,
    Vietnamese = 9,
}

impl Language {
    /// ISO 639-1 code, with region where the upstream language has one
    pub fn iso_code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::Indonesian => "id",
            Self::PortugueseBr => "pt-BR",
            Self::Russian => "ru",
            Self::Thai => "th",
            Self::German => "de",
            Self::Italian => "it",
            Self::Vietnamese => "vi",
        }
    }
}

/// Messages served by the web API
pub mod web {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Response {
        #[prost(message, optional, tag = "1")]
        pub success: Option<SuccessResult>,
        #[prost(message, optional, tag = "2")]
        pub error: Option<ErrorResult>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ErrorResult {
        #[prost(int32, tag = "1")]
        pub action: i32,
        #[prost(message, optional, tag = "2")]
        pub english_popup: Option<Popup>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Popup {
        #[prost(string, tag = "1")]
        pub subject: String,
        #[prost(string, tag = "2")]
        pub body: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SuccessResult {
        #[prost(message, optional, tag = "8")]
        pub title_detail_view: Option<TitleDetailView>,
        #[prost(message, optional, tag = "10")]
        pub manga_viewer: Option<MangaViewer>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TitleDetailView {
        #[prost(message, optional, tag = "1")]
        pub title: Option<Title>,
        #[prost(string, tag = "3")]
        pub overview: String,
        #[prost(message, repeated, tag = "9")]
        pub first_chapter_list: Vec<Chapter>,
        #[prost(message, repeated, tag = "10")]
        pub last_chapter_list: Vec<Chapter>,
        #[prost(message, repeated, tag = "28")]
        pub chapter_list_group: Vec<ChapterListGroup>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChapterListGroup {
        #[prost(string, tag = "1")]
        pub chapter_numbers: String,
        #[prost(message, repeated, tag = "2")]
        pub first_chapter_list: Vec<Chapter>,
        #[prost(message, repeated, tag = "3")]
        pub mid_chapter_list: Vec<Chapter>,
        #[prost(message, repeated, tag = "4")]
        pub last_chapter_list: Vec<Chapter>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Title {
        #[prost(uint32, tag = "1")]
        pub title_id: u32,
        #[prost(string, tag = "2")]
        pub name: String,
        #[prost(string, tag = "3")]
        pub author: String,
        #[prost(string, tag = "4")]
        pub portrait_image_url: String,
        #[prost(string, tag = "5")]
        pub landscape_image_url: String,
        #[prost(uint32, tag = "6")]
        pub view_count: u32,
        #[prost(enumeration = "super::Language", tag = "7")]
        pub language: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Chapter {
        #[prost(uint32, tag = "1")]
        pub title_id: u32,
        #[prost(uint32, tag = "2")]
        pub chapter_id: u32,
        #[prost(string, tag = "3")]
        pub name: String,
        #[prost(string, tag = "4")]
        pub sub_title: String,
        #[prost(string, tag = "5")]
        pub thumbnail_url: String,
        #[prost(uint32, tag = "6")]
        pub start_time_stamp: u32,
        #[prost(uint32, tag = "7")]
        pub end_time_stamp: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MangaViewer {
        #[prost(message, repeated, tag = "1")]
        pub pages: Vec<Page>,
        #[prost(uint32, tag = "2")]
        pub chapter_id: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Page {
        #[prost(message, optional, tag = "1")]
        pub manga_page: Option<MangaPage>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MangaPage {
        #[prost(string, tag = "1")]
        pub image_url: String,
        #[prost(uint32, tag = "2")]
        pub width: u32,
        #[prost(uint32, tag = "3")]
        pub height: u32,
        #[prost(string, tag = "5")]
        pub encryption_key: String,
    }
}

/// Messages served by the authenticated app API
pub mod app {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Response {
        #[prost(message, optional, tag = "1")]
        pub success: Option<SuccessResult>,
        #[prost(message, optional, tag = "2")]
        pub error: Option<ErrorResult>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ErrorResult {
        #[prost(int32, tag = "1")]
        pub action: i32,
        #[prost(message, optional, tag = "2")]
        pub default: Option<Popup>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Popup {
        #[prost(string, tag = "1")]
        pub subject: String,
        #[prost(string, tag = "2")]
        pub body: String,
        #[prost(string, tag = "5")]
        pub code: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SuccessResult {
        #[prost(message, optional, tag = "8")]
        pub title_detail_view: Option<TitleDetailView>,
        #[prost(message, optional, tag = "10")]
        pub manga_viewer: Option<MangaViewer>,
        #[prost(message, optional, tag = "14")]
        pub register_view: Option<RegisterView>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct RegisterView {
        #[prost(string, tag = "1")]
        pub secret: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TitleDetailView {
        #[prost(message, optional, tag = "1")]
        pub title: Option<Title>,
        #[prost(string, tag = "3")]
        pub overview: String,
        #[prost(message, repeated, tag = "28")]
        pub chapters: Vec<ChapterGroup>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChapterGroup {
        #[prost(string, tag = "1")]
        pub chapter_numbers: String,
        #[prost(message, repeated, tag = "2")]
        pub first_chapter_list: Vec<Chapter>,
        #[prost(message, repeated, tag = "3")]
        pub chapter_list: Vec<Chapter>,
        #[prost(message, repeated, tag = "4")]
        pub last_chapter_list: Vec<Chapter>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Title {
        #[prost(uint32, tag = "1")]
        pub title_id: u32,
        #[prost(string, tag = "2")]
        pub title_name: String,
        #[prost(string, tag = "3")]
        pub author: String,
        #[prost(string, tag = "4")]
        pub portrait_image_url: String,
        #[prost(string, tag = "5")]
        pub landscape_image_url: String,
        #[prost(uint32, tag = "6")]
        pub view_count: u32,
        #[prost(enumeration = "super::Language", tag = "7")]
        pub language: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Chapter {
        #[prost(uint32, tag = "1")]
        pub title_id: u32,
        #[prost(uint32, tag = "2")]
        pub chapter_id: u32,
        #[prost(string, tag = "3")]
        pub title_name: String,
        #[prost(string, tag = "4")]
        pub chapter_sub_title: String,
        #[prost(string, tag = "5")]
        pub thumbnail_url: String,
        #[prost(uint32, tag = "6")]
        pub start_time_stamp: u32,
        #[prost(uint32, tag = "7")]
        pub end_time_stamp: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MangaViewer {
        #[prost(message, repeated, tag = "1")]
        pub pages: Vec<Page>,
        #[prost(uint32, tag = "2")]
        pub chapter_id: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Page {
        #[prost(message, optional, tag = "1")]
        pub page: Option<MangaPage>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct MangaPage {
        #[prost(string, tag = "1")]
        pub image_page: String,
        #[prost(uint32, tag = "2")]
        pub width: u32,
        #[prost(uint32, tag = "3")]
        pub height: u32,
        #[prost(string, tag = "5")]
        pub encryption_key: String,
    }
}
