//! CloudFormation intrinsic function short-hand tags

/// How a tag consumes its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagArity {
    /// One scalar, kept verbatim as a string
    Scalar,
    /// One scalar of the form `Resource.Attribute`, split on `.`
    DottedScalar,
    /// An ordered list of (possibly tagged) nodes
    Sequence,
}

/// The closed set of short-hand tags a template may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicTag {
    Ref,
    Sub,
    GetAtt,
    Join,
    Select,
    GetAZs,
    Split,
    Base64,
    Cidr,
    ImportValue,
    FindInMap,
    If,
    Equals,
    Not,
    And,
    Or,
}

impl IntrinsicTag {
    pub const ALL: [IntrinsicTag; 16] = [
        IntrinsicTag::Ref,
        IntrinsicTag::Sub,
        IntrinsicTag::GetAtt,
        IntrinsicTag::Join,
        IntrinsicTag::Select,
        IntrinsicTag::GetAZs,
        IntrinsicTag::Split,
        IntrinsicTag::Base64,
        IntrinsicTag::Cidr,
        IntrinsicTag::ImportValue,
        IntrinsicTag::FindInMap,
        IntrinsicTag::If,
        IntrinsicTag::Equals,
        IntrinsicTag::Not,
        IntrinsicTag::And,
        IntrinsicTag::Or,
    ];

    /// Tag name as written after the `!`
    pub fn name(&self) -> &'static str {
        match self {
            IntrinsicTag::Ref => "Ref",
            IntrinsicTag::Sub => "Sub",
            IntrinsicTag::GetAtt => "GetAtt",
            IntrinsicTag::Join => "Join",
            IntrinsicTag::Select => "Select",
            IntrinsicTag::GetAZs => "GetAZs",
            IntrinsicTag::Split => "Split",
            IntrinsicTag::Base64 => "Base64",
            IntrinsicTag::Cidr => "Cidr",
            IntrinsicTag::ImportValue => "ImportValue",
            IntrinsicTag::FindInMap => "FindInMap",
            IntrinsicTag::If => "If",
            IntrinsicTag::Equals => "Equals",
            IntrinsicTag::Not => "Not",
            IntrinsicTag::And => "And",
            IntrinsicTag::Or => "Or",
        }
    }

    /// Key used by the long-form syntax
    pub fn long_form(&self) -> &'static str {
        match self {
            IntrinsicTag::Ref => "Ref",
            IntrinsicTag::Sub => "Fn::Sub",
            IntrinsicTag::GetAtt => "Fn::GetAtt",
            IntrinsicTag::Join => "Fn::Join",
            IntrinsicTag::Select => "Fn::Select",
            IntrinsicTag::GetAZs => "Fn::GetAZs",
            IntrinsicTag::Split => "Fn::Split",
            IntrinsicTag::Base64 => "Fn::Base64",
            IntrinsicTag::Cidr => "Fn::Cidr",
            IntrinsicTag::ImportValue => "Fn::ImportValue",
            IntrinsicTag::FindInMap => "Fn::FindInMap",
            IntrinsicTag::If => "Fn::If",
            IntrinsicTag::Equals => "Fn::Equals",
            IntrinsicTag::Not => "Fn::Not",
            IntrinsicTag::And => "Fn::And",
            IntrinsicTag::Or => "Fn::Or",
        }
    }

    pub fn arity(&self) -> TagArity {
        match self {
            IntrinsicTag::Ref
            | IntrinsicTag::Sub
            | IntrinsicTag::GetAZs
            | IntrinsicTag::Base64
            | IntrinsicTag::ImportValue => TagArity::Scalar,
            IntrinsicTag::GetAtt => TagArity::DottedScalar,
            IntrinsicTag::Join
            | IntrinsicTag::Select
            | IntrinsicTag::Split
            | IntrinsicTag::Cidr
            | IntrinsicTag::FindInMap
            | IntrinsicTag::If
            | IntrinsicTag::Equals
            | IntrinsicTag::Not
            | IntrinsicTag::And
            | IntrinsicTag::Or => TagArity::Sequence,
        }
    }
}
