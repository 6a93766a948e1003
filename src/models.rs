//! Request and response payloads exchanged with SyncFlow project endpoints.
//!
//! Field names follow the server's camelCase JSON. Optional request fields are omitted
//! when unset so the server applies its own defaults, and unknown response fields are
//! ignored.

// self
use crate::{
	_prelude::*,
	auth::{DeviceId, ProjectId, SessionId},
	error::ValidationError,
};

/// Session status reported while a session is live.
pub const SESSION_STATUS_STARTED: &str = "Started";

/// Project metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
	/// Project identifier.
	pub id: ProjectId,
	/// Display name.
	pub name: String,
	/// Free-form comments.
	#[serde(default)]
	pub comments: Option<String>,
	/// LiveKit server the project's sessions run on.
	#[serde(default)]
	pub livekit_server_url: Option<String>,
	/// Recording storage backend.
	#[serde(default)]
	pub storage_type: Option<String>,
	/// Recording bucket.
	#[serde(default)]
	pub bucket_name: Option<String>,
	/// Recording storage endpoint.
	#[serde(default)]
	pub endpoint: Option<String>,
	/// Last modification timestamp as reported by the server.
	#[serde(default)]
	pub last_updated: Option<String>,
}

/// Aggregate counters for a project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectSummary {
	/// Sessions ever created.
	pub num_sessions: u64,
	/// Sessions currently live.
	pub num_active_sessions: u64,
	/// Participants across all sessions.
	pub num_participants: u64,
	/// Recordings produced.
	pub num_recordings: u64,
	/// Registered devices.
	pub num_devices: u64,
}

/// Body of `POST projects/{id}/create-session`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionRequest {
	/// Session (room) name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Free-form comments.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub comments: Option<String>,
	/// Seconds an empty room is kept alive.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub empty_timeout: Option<u32>,
	/// Participant cap.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_participants: Option<u32>,
	/// Starts recording as soon as the session opens.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub auto_recording: Option<bool>,
	/// Device groups notified about the session.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub device_groups: Vec<String>,
}
impl NewSessionRequest {
	/// Starts a request for a session called `name`.
	pub fn named(name: impl Into<String>) -> Self {
		Self { name: Some(name.into()), ..Default::default() }
	}
}

/// A session as reported by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSessionResponse {
	/// Session identifier.
	pub id: SessionId,
	/// Session name.
	pub name: String,
	/// Lifecycle status, e.g. [`SESSION_STATUS_STARTED`].
	pub status: String,
	/// Name of the backing LiveKit room.
	#[serde(default)]
	pub livekit_room_name: Option<String>,
	/// Free-form comments.
	#[serde(default)]
	pub comments: Option<String>,
	/// Seconds an empty room is kept alive.
	#[serde(default)]
	pub empty_timeout: Option<u32>,
	/// Participant cap.
	#[serde(default)]
	pub max_participants: Option<u32>,
	/// Whether recording started automatically.
	#[serde(default)]
	pub auto_recording: bool,
	/// Device groups notified about the session.
	#[serde(default)]
	pub device_groups: Vec<String>,
	/// Start timestamp as reported by the server.
	#[serde(default)]
	pub started_at: Option<String>,
	/// Owning project.
	#[serde(default)]
	pub project_id: Option<String>,
}
impl ProjectSessionResponse {
	/// Returns `true` while the session is live.
	pub fn is_active(&self) -> bool {
		self.status == SESSION_STATUS_STARTED
	}
}

/// LiveKit permissions granted to a session token.
///
/// Unset grants are omitted so LiveKit's defaults apply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrants {
	/// Room the grants apply to.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub room: Option<String>,
	/// May join `room`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub room_join: Option<bool>,
	/// May create rooms.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub room_create: Option<bool>,
	/// May list rooms.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub room_list: Option<bool>,
	/// May record rooms.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub room_record: Option<bool>,
	/// May administer `room`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub room_admin: Option<bool>,
	/// May publish tracks.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub can_publish: Option<bool>,
	/// May publish data messages.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub can_publish_data: Option<bool>,
	/// Track sources the holder may publish (e.g. `camera`, `screen`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub can_publish_sources: Option<Vec<String>>,
	/// May subscribe to tracks.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub can_subscribe: Option<bool>,
	/// May update their own metadata.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub can_update_own_metadata: Option<bool>,
	/// Hidden from other participants.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hidden: Option<bool>,
	/// May administer ingress.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ingress_admin: Option<bool>,
	/// Joins as a recorder.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recorder: Option<bool>,
}
impl VideoGrants {
	/// Grants joining `room` and nothing else.
	pub fn join(room: impl Into<String>) -> Self {
		Self { room: Some(room.into()), room_join: Some(true), ..Default::default() }
	}
}

/// Body of `POST projects/{id}/sessions/{id}/token`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
	/// Participant identity embedded in the LiveKit token.
	pub identity: String,
	/// Display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Participant metadata.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metadata: Option<String>,
	/// Permissions for the participant.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub video_grants: Option<VideoGrants>,
}
impl TokenRequest {
	/// Starts a request for `identity` without grants.
	pub fn new(identity: impl Into<String>) -> Self {
		Self { identity: identity.into(), ..Default::default() }
	}

	/// Attaches `grants`.
	pub fn with_video_grants(mut self, grants: VideoGrants) -> Self {
		self.video_grants = Some(grants);

		self
	}

	/// Checks the fields the server requires before any request is sent.
	///
	/// `identity` must not be blank, and grants that ask to join a room must name it.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.identity.trim().is_empty() {
			return Err(ValidationError::MissingField { field: "identity" });
		}
		if let Some(grants) = &self.video_grants
			&& grants.room_join == Some(true)
			&& grants.room.as_deref().is_none_or(|room| room.trim().is_empty())
		{
			return Err(ValidationError::MissingField { field: "videoGrants.room" });
		}

		Ok(())
	}
}

/// LiveKit access token minted for a participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Signed LiveKit token.
	pub token: String,
	/// Identity the token was minted for.
	pub identity: String,
}

/// A participant of a live session, as reported by LiveKit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
	/// LiveKit participant SID.
	pub sid: String,
	/// Participant identity.
	pub identity: String,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Connection state.
	#[serde(default)]
	pub state: Option<serde_json::Value>,
	/// Participant metadata.
	#[serde(default)]
	pub metadata: Option<String>,
	/// Join time in seconds since the Unix epoch.
	#[serde(default)]
	pub joined_at: Option<i64>,
	/// Whether the participant publishes tracks.
	#[serde(default)]
	pub is_publisher: bool,
	/// Remaining LiveKit fields, kept verbatim.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST projects/{id}/devices`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegisterRequest {
	/// Device display name.
	pub device_name: String,
	/// Group used to target session notifications.
	pub device_group: String,
	/// Free-form comments.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub comments: Option<String>,
}

/// A device registered with a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
	/// Device identifier.
	pub id: DeviceId,
	/// Device display name.
	pub device_name: String,
	/// Group used to target session notifications.
	pub device_group: String,
	/// Free-form comments.
	#[serde(default)]
	pub comments: Option<String>,
	/// Registration timestamp as reported by the server.
	#[serde(default)]
	pub registered_at: Option<String>,
	/// User that registered the device.
	#[serde(default)]
	pub registered_by: Option<String>,
	/// Owning project.
	#[serde(default)]
	pub project_id: Option<String>,
}

/// Plain acknowledgement returned by some endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
	/// Human-readable message.
	pub message: String,
	/// Status code echoed by the server.
	pub status: u16,
}
