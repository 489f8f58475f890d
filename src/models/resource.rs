use std::fmt;

/// 远程资源集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// 判决
    Sentencias,
    /// 公告
    Edictos,
}

impl Resource {
    /// 集合在 API 中的路径段
    pub fn collection(self) -> &'static str {
        match self {
            Resource::Sentencias => "sentencias",
            Resource::Edictos => "edictos",
        }
    }

    /// 日志中使用的名称
    pub fn name(self) -> &'static str {
        match self {
            Resource::Sentencias => "判决",
            Resource::Edictos => "公告",
        }
    }

    /// 列表端点
    pub fn list_path(self) -> String {
        format!("/api/v5/{}", self.collection())
    }

    /// 单条记录端点
    pub fn detail_path(self, id: i64) -> String {
        format!("/api/v5/{}/{}", self.collection(), id)
    }

    /// RAG 结果写回端点
    pub fn rag_path(self) -> String {
        format!("/api/v5/{}/rag", self.collection())
    }

    /// 尝试从字符串解析（不区分大小写）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentencias" | "sentencia" => Some(Resource::Sentencias),
            "edictos" | "edicto" => Some(Resource::Edictos),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}
